//! Family records linking parents and children

use serde::{Deserialize, Serialize};

use super::individual::IndividualId;

/// Unique identifier for a family (e.g. `@F3@`)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FamilyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A family unit: up to two parents (HUSB/WIFE) and any number of children
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    #[serde(default)]
    pub parents: Vec<IndividualId>,
    #[serde(default)]
    pub children: Vec<IndividualId>,
}

impl Family {
    pub fn new(id: impl Into<FamilyId>) -> Self {
        Self {
            id: id.into(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<IndividualId>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<IndividualId>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn has_parent(&self, id: &IndividualId) -> bool {
        self.parents.contains(id)
    }

    pub fn has_child(&self, id: &IndividualId) -> bool {
        self.children.contains(id)
    }
}
