//! Serialization tests for record-graph types

use serde_json::{json, Value};

/// Fixture: one serialized individual with a nested birth event
fn individual_fixture() -> Value {
    json!({
        "id": "@I1@",
        "name": "Thomas Moss",
        "fields": [
            {
                "tag": "BIRT",
                "year": 1851,
                "children": [
                    { "tag": "DATE", "value": "12 MAR 1851" },
                    { "tag": "PLAC", "value": "Chester, Cheshire, England" }
                ]
            }
        ],
        "parent_families": ["@F1@"],
        "spouse_families": []
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{Family, FamilyId, Field, Individual, IndividualId};

    #[test]
    fn individual_id_serializes_as_string() {
        let id = IndividualId::from_string("@I1@");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"@I1@\"");
    }

    #[test]
    fn family_id_deserializes_from_string() {
        let id: FamilyId = serde_json::from_str("\"@F7@\"").unwrap();
        assert_eq!(id.as_str(), "@F7@");
    }

    #[test]
    fn individual_deserializes_from_fixture() {
        let person: Individual = serde_json::from_value(individual_fixture()).unwrap();
        assert_eq!(person.id.as_str(), "@I1@");
        assert_eq!(person.birth_year(), Some(1851));
        assert_eq!(
            person.field("BIRT").and_then(|f| f.child_value("PLAC")),
            Some("Chester, Cheshire, England")
        );
        assert_eq!(person.parent_families, vec![FamilyId::from("@F1@")]);
    }

    #[test]
    fn empty_field_parts_are_skipped() {
        let field = Field::new("NOTE");
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("value").is_none());
        assert!(json.get("year").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn family_roundtrip_keeps_member_order() {
        let family = Family::new("@F1@")
            .with_parent("@I2@")
            .with_parent("@I1@")
            .with_child("@I3@");
        let json = serde_json::to_string(&family).unwrap();
        let back: Family = serde_json::from_str(&json).unwrap();
        assert_eq!(back.parents, family.parents);
        assert_eq!(back.children, family.children);
    }
}
