//! End-to-end: record text in, classified reports out

mod common;

use common::{moss_api, moss_graph};
use kindred::{
    AncestorQuery, ConfigStore, FieldKind, IndividualId, KindredApi, OccupationClass, PlaceClass,
};

fn chester() -> PlaceClass {
    PlaceClass::CountyPlace {
        nation: "England".into(),
        county: "Cheshire".into(),
        place: Some("Chester".into()),
        locality: None,
    }
}

#[test]
fn structured_and_note_birthplaces_agree() {
    let api = moss_api();
    let extraction = api
        .extract_fields(&IndividualId::from("@I1@"), FieldKind::Birthplace)
        .unwrap();

    let tags: Vec<&str> = extraction.fields.iter().map(|f| f.tag.as_str()).collect();
    assert_eq!(tags, vec!["BIRT.PLAC", "NOTE"]);
    assert_eq!(extraction.fields[0].year, Some(1851));
    assert_eq!(extraction.distinct_values(), vec!["chester, cheshire, england"]);

    for field in &extraction.fields {
        let result = api.classify_place(&field.value);
        assert_eq!(result.class, chester());
        assert!(!result.fuzzy);
        assert!(result.listed);
    }
}

#[test]
fn apprentice_blacksmith_keeps_group_and_pattern() {
    let api = moss_api();
    let class = api.classify_occupation("Apprentice Blacksmith");
    assert_eq!(class.group(), Some("Blacksmith"));
    assert_eq!(class.display_name(), "Blacksmith (apprentice)");

    // The longer alias wins over the shorter one it contains
    match class {
        OccupationClass::Group { alias, .. } => assert_eq!(alias, "blacksmith"),
        other => panic!("expected a group, got {:?}", other),
    }
}

#[test]
fn unknown_place_stays_verbatim() {
    let api = moss_api();
    let result = api.classify_place("Xyzzyville");
    assert_eq!(
        result.class,
        PlaceClass::Unclassified {
            original: "Xyzzyville".into()
        }
    );
    assert!(!result.fuzzy);
}

#[test]
fn misspelt_county_is_corrected() {
    let api = moss_api();
    let result = api.classify_place("Mold, Flintshre, Wales");
    assert!(result.fuzzy);
    assert_eq!(result.class.nation(), Some("Wales"));
    assert_eq!(result.class.to_string(), "Mold, Flintshire, Wales");
}

#[test]
fn lineage_birthplace_report() {
    let mut api = moss_api();
    api.set_scope(AncestorQuery::from("@I1@")).unwrap();
    let report = api.birthplace_report();

    // Thomas, his parents and his grandfather; Sarah and Ann are out of scope
    assert_eq!(report.individuals, 4);
    assert!(report.missing.is_empty());
    assert!(report.multiple.is_empty());

    let england = &report.nations["England"];
    assert_eq!(england.total, 2);
    assert_eq!(england.entries["Cheshire"].places["Chester"], 1);
    assert!(england.entries["London"].direct);

    let wales = &report.nations["Wales"];
    assert_eq!(wales.entries["Flintshire"].places["Mold"], 1);

    assert_eq!(report.fuzzy.len(), 1);
    assert_eq!(report.fuzzy[0].person.name, "John Moss");
    assert_eq!(report.unclassified["Xyzzyville"], 1);
    assert_eq!(report.classified_count(), 3);
}

#[test]
fn whole_tree_birthplace_report_lists_missing() {
    let report = moss_api().birthplace_report();
    assert_eq!(report.individuals, 6);
    let missing: Vec<&str> = report.missing.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(missing, vec!["Sarah Moss", "Ann Platt"]);
}

#[test]
fn occupation_report_across_the_tree() {
    let report = moss_api().occupation_report();
    assert_eq!(report.individuals, 6);
    assert_eq!(report.with_occupation, 4);

    let smiths = &report.groups["Blacksmith"];
    assert_eq!(smiths.total, 2);
    assert_eq!(smiths.variants["Blacksmith"], 1);
    assert_eq!(smiths.variants["Blacksmith (apprentice)"], 1);
    assert_eq!(report.groups["Agricultural Labourer"].total, 1);

    // Found in a free-text note, but not configured
    assert_eq!(report.unclassified["dressmaker"], 1);
}

#[test]
fn empty_configuration_classifies_nothing() {
    let api = KindredApi::new(moss_graph(), ConfigStore::default());
    let report = api.birthplace_report();
    assert!(report.nations.is_empty());
    assert_eq!(report.unclassified["Chester, Cheshire, England"], 1);
    assert!(!api.classify_occupation("Blacksmith").is_classified());
}

#[test]
fn negative_age_and_orphan_checks() {
    let api = moss_api();
    let anomalies = api.negative_ages();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].person.name, "Ann Platt");
    assert!(anomalies[0].age < 0);

    let orphans = api.orphans();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, IndividualId::from("@I6@"));
}

#[test]
fn report_serializes_for_the_cli() {
    let report = moss_api().birthplace_report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["nations"]["England"]["entries"]["London"]["direct"], true);
    assert_eq!(json["unclassified"]["Xyzzyville"], 1);
}
