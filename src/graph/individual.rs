//! Individual records and their annotation fields

use serde::{Deserialize, Serialize};

use super::family::FamilyId;

/// Unique identifier for an individual
///
/// Serializes as a plain string (the record's cross-reference, e.g. `@I12@`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndividualId(String);

impl IndividualId {
    /// Create an IndividualId from a cross-reference string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndividualId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IndividualId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for IndividualId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A tagged annotation on a record, with nested sub-fields of any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Record tag (e.g. "BIRT", "PLAC", "NOTE")
    pub tag: String,
    /// Line value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Year resolved from a DATE sub-field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Nested sub-fields in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Field>,
}

impl Field {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
            year: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_child(mut self, child: Field) -> Self {
        self.children.push(child);
        self
    }

    /// First direct sub-field with the given tag
    pub fn child(&self, tag: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Value of the first direct sub-field with the given tag
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(|c| c.value.as_deref())
    }
}

/// A person in the record graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub id: IndividualId,
    /// Display name with surname slashes removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Top-level annotation fields in source order
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Families in which this person is a child (FAMC)
    #[serde(default)]
    pub parent_families: Vec<FamilyId>,
    /// Families in which this person is a spouse (FAMS)
    #[serde(default)]
    pub spouse_families: Vec<FamilyId>,
}

impl Individual {
    pub fn new(id: impl Into<IndividualId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            fields: Vec::new(),
            parent_families: Vec::new(),
            spouse_families: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_parent_family(mut self, family: impl Into<FamilyId>) -> Self {
        self.parent_families.push(family.into());
        self
    }

    pub fn with_spouse_family(mut self, family: impl Into<FamilyId>) -> Self {
        self.spouse_families.push(family.into());
        self
    }

    /// Name for display, falling back to the identifier
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// First top-level field with the given tag
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Birth year from BIRT, falling back to baptism and christening dates
    pub fn birth_year(&self) -> Option<i32> {
        ["BIRT", "BAPM", "CHR"]
            .iter()
            .find_map(|tag| self.field(tag).and_then(|f| f.year))
    }

    /// Death year from DEAT, falling back to burial
    pub fn death_year(&self) -> Option<i32> {
        ["DEAT", "BURI"]
            .iter()
            .find_map(|tag| self.field(tag).and_then(|f| f.year))
    }

    /// Raw DATE value of a top-level event
    pub fn event_date(&self, tag: &str) -> Option<&str> {
        self.field(tag).and_then(|f| f.child_value("DATE"))
    }
}
