//! Ancestor walks, lineage scope and name search over parsed records

mod common;

use common::{moss_api, moss_graph};
use kindred::{
    AncestorQuery, GedcomParser, GraphError, IndividualId, KindredError, PersonSearch, SortOrder,
    YearRange,
};

fn id(raw: &str) -> IndividualId {
    IndividualId::from(raw)
}

#[test]
fn walk_groups_ancestors_by_generation() {
    let set = AncestorQuery::from("@I1@").execute(&moss_graph()).unwrap();

    assert_eq!(set.generations.len(), 3);
    assert_eq!(set.generations[0], vec![id("@I1@")]);
    assert_eq!(set.generation_of(&id("@I2@")), Some(1));
    assert_eq!(set.generation_of(&id("@I3@")), Some(1));
    assert_eq!(set.generation_of(&id("@I4@")), Some(2));
    assert!(!set.contains(&id("@I5@")));
    assert!(set.cycles.is_empty());
}

#[test]
fn relations_bring_in_siblings() {
    let set = AncestorQuery::from("@I1@")
        .with_relations(true)
        .execute(&moss_graph())
        .unwrap();
    assert_eq!(set.relations, vec![id("@I5@")]);
    assert_eq!(set.len(), 5);
}

#[test]
fn year_range_trims_the_walk() {
    let set = AncestorQuery::from("@I1@")
        .years(YearRange::between(Some(1800), None))
        .execute(&moss_graph())
        .unwrap();
    assert!(!set.contains(&id("@I4@")));
    assert_eq!(set.excluded, vec![id("@I4@")]);
    assert!(set.contains(&id("@I3@")));
}

#[test]
fn generation_cap() {
    let set = AncestorQuery::from("@I1@")
        .max_generations(1)
        .execute(&moss_graph())
        .unwrap();
    assert_eq!(set.len(), 3);
    assert!(!set.contains(&id("@I4@")));
}

#[test]
fn unknown_root_is_an_error() {
    let err = moss_api().ancestors(&id("@I99@"), None).unwrap_err();
    assert!(matches!(
        err,
        KindredError::Graph(GraphError::IndividualNotFound(_))
    ));
}

#[test]
fn cyclic_parent_links_terminate() {
    let records = "\
0 @I1@ INDI
1 NAME Loop /One/
1 FAMC @F1@
0 @I2@ INDI
1 NAME Loop /Two/
1 FAMC @F2@
0 @F1@ FAM
1 HUSB @I2@
1 CHIL @I1@
0 @F2@ FAM
1 HUSB @I1@
1 CHIL @I2@
";
    let graph = GedcomParser::new().parse(records.as_bytes()).unwrap();
    let set = AncestorQuery::from("@I1@").execute(&graph).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.cycles.len(), 1);
    assert_eq!(set.cycles[0].ancestor, id("@I1@"));
}

#[test]
fn search_by_surname_in_birth_order() {
    let api = moss_api();
    let found = api.search(&PersonSearch::new("moss"));
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["William Moss", "John Moss", "Thomas Moss", "Sarah Moss"]
    );
}

#[test]
fn search_respects_scope_and_bounds() {
    let mut api = moss_api();
    api.set_scope(AncestorQuery::from("@I1@")).unwrap();

    let found = api.search(&PersonSearch::new("moss").order(SortOrder::Name));
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["John Moss", "Thomas Moss", "William Moss"]);

    let found = api.search(&PersonSearch::new("moss").born_between(Some(1800), Some(1850)));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id("@I2@"));

    api.clear_scope();
    assert_eq!(api.search(&PersonSearch::new("Sarah Moss").exact()).len(), 1);
}
