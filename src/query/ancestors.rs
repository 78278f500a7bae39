//! Ancestor lineage walk

use super::types::{AncestorSet, Cycle, YearRange};
use crate::graph::{GenealogyGraph, GraphResult, Individual, IndividualId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Query for the direct ancestors of one individual
#[derive(Debug, Clone)]
pub struct AncestorQuery {
    /// Starting individual (generation 0)
    pub root: IndividualId,
    /// Birth-year filter applied after the walk
    pub years: YearRange,
    /// Also collect siblings, spouses and children of every ancestor
    pub with_relations: bool,
    /// Maximum number of parent generations to climb
    pub max_generations: Option<usize>,
}

impl AncestorQuery {
    /// Create a new query rooted at `root`
    pub fn from(root: impl Into<IndividualId>) -> Self {
        Self {
            root: root.into(),
            years: YearRange::any(),
            with_relations: false,
            max_generations: None,
        }
    }

    /// Filter members by birth year
    pub fn years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_relations(mut self, with_relations: bool) -> Self {
        self.with_relations = with_relations;
        self
    }

    /// Stop after this many parent generations
    pub fn max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = Some(max_generations);
        self
    }

    /// Walk parent links breadth-first from the root.
    ///
    /// Each individual is visited once. A parent link to an individual
    /// already on the discovering individual's own descent path is recorded
    /// as a cycle; any other repeat is pedigree collapse. Neither stops the
    /// walk.
    pub fn execute(&self, graph: &GenealogyGraph) -> GraphResult<AncestorSet> {
        graph.require_individual(&self.root)?;

        let mut result = AncestorSet::new(self.root.clone());
        let mut visited: HashSet<IndividualId> = HashSet::from([self.root.clone()]);
        // ancestor -> the child through which it was first reached
        let mut reached_via: HashMap<IndividualId, IndividualId> = HashMap::new();
        let mut current_level = vec![self.root.clone()];

        while !current_level.is_empty() {
            if let Some(max) = self.max_generations {
                if result.generations.len() > max {
                    break;
                }
            }

            let mut next_level: Vec<IndividualId> = Vec::new();
            for person in &current_level {
                for parent in graph.parents_of(person) {
                    if graph.individual(&parent).is_none() {
                        debug!(person = %person, parent = %parent, "parent link to missing individual");
                        continue;
                    }

                    if visited.contains(&parent) {
                        if on_descent_path(&reached_via, person, &parent) {
                            warn!(person = %person, ancestor = %parent, "cycle in parent links; edge skipped");
                            result.cycles.push(Cycle {
                                descendant: person.clone(),
                                ancestor: parent,
                            });
                        } else {
                            debug!(person = %person, ancestor = %parent, "ancestor reached twice");
                        }
                        continue;
                    }

                    visited.insert(parent.clone());
                    reached_via.insert(parent.clone(), person.clone());
                    next_level.push(parent);
                }
            }

            if !next_level.is_empty() {
                result.generations.push(next_level.clone());
            }
            current_level = next_level;
        }

        if self.with_relations {
            result.relations = relations_of(graph, &result, &visited);
        }

        if !self.years.is_unbounded() {
            let mut excluded = Vec::new();
            for generation in &mut result.generations {
                retain_in_range(generation, graph, &self.years, &mut excluded);
            }
            retain_in_range(&mut result.relations, graph, &self.years, &mut excluded);
            result.excluded = excluded;
        }

        debug!(
            root = %self.root,
            members = result.len(),
            generations = result.generations.len(),
            cycles = result.cycles.len(),
            "ancestor walk complete"
        );
        Ok(result)
    }
}

/// True when `target` is `from` or lies on the chain `from` was reached by
fn on_descent_path(
    reached_via: &HashMap<IndividualId, IndividualId>,
    from: &IndividualId,
    target: &IndividualId,
) -> bool {
    let mut current = Some(from);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        current = reached_via.get(id);
    }
    false
}

fn relations_of(
    graph: &GenealogyGraph,
    set: &AncestorSet,
    ancestors: &HashSet<IndividualId>,
) -> Vec<IndividualId> {
    let mut seen = ancestors.clone();
    let mut relations = Vec::new();
    for id in set.generations.iter().flatten() {
        let related = graph
            .siblings_of(id)
            .into_iter()
            .chain(graph.spouses_of(id))
            .chain(graph.children_of(id));
        for relation in related {
            if graph.individual(&relation).is_some() && seen.insert(relation.clone()) {
                relations.push(relation);
            }
        }
    }
    relations
}

fn retain_in_range(
    ids: &mut Vec<IndividualId>,
    graph: &GenealogyGraph,
    years: &YearRange,
    excluded: &mut Vec<IndividualId>,
) {
    ids.retain(|id| {
        let year = graph.individual(id).and_then(Individual::birth_year);
        let keep = years.contains(year);
        if !keep {
            excluded.push(id.clone());
        }
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Family, Field, GraphError};

    fn person(id: &str, born: Option<i32>) -> Individual {
        let individual = Individual::new(id).with_name(id.trim_matches('@'));
        match born {
            Some(year) => individual.with_field(Field::new("BIRT").with_year(year)),
            None => individual,
        }
    }

    fn family(id: &str, parents: &[&str], children: &[&str]) -> Family {
        let mut family = Family::new(id);
        for parent in parents {
            family = family.with_parent(*parent);
        }
        for child in children {
            family = family.with_child(*child);
        }
        family
    }

    /// I1 <- (I2, I3) ; I2 <- (I4, I5) ; I3 <- (I6) ; I7 sibling of I1 ; I8 spouse of I1
    fn create_test_graph() -> GenealogyGraph {
        let mut graph = GenealogyGraph::new();
        graph.add_individual(person("@I1@", Some(1900)));
        graph.add_individual(person("@I2@", Some(1870)));
        graph.add_individual(person("@I3@", Some(1872)));
        graph.add_individual(person("@I4@", Some(1840)));
        graph.add_individual(person("@I5@", None));
        graph.add_individual(person("@I6@", Some(1845)));
        graph.add_individual(person("@I7@", Some(1903)));
        graph.add_individual(person("@I8@", Some(1901)));
        graph.add_family(family("@F1@", &["@I2@", "@I3@"], &["@I1@", "@I7@"]));
        graph.add_family(family("@F2@", &["@I4@", "@I5@"], &["@I2@"]));
        graph.add_family(family("@F3@", &["@I6@"], &["@I3@"]));
        graph.add_family(family("@F4@", &["@I1@", "@I8@"], &[]));
        graph
    }

    fn ids(list: &[&str]) -> Vec<IndividualId> {
        list.iter().map(|id| IndividualId::from(*id)).collect()
    }

    #[test]
    fn test_walk_by_generation() {
        let graph = create_test_graph();
        let set = AncestorQuery::from("@I1@").execute(&graph).unwrap();

        assert_eq!(set.generations[0], ids(&["@I1@"]));
        assert_eq!(set.generations[1], ids(&["@I2@", "@I3@"]));
        assert_eq!(set.generations[2], ids(&["@I4@", "@I5@", "@I6@"]));
        assert_eq!(set.len(), 6);
        assert!(set.cycles.is_empty());
        assert!(!set.contains(&"@I7@".into()));
    }

    #[test]
    fn test_max_generations() {
        let graph = create_test_graph();
        let set = AncestorQuery::from("@I1@")
            .max_generations(1)
            .execute(&graph)
            .unwrap();
        assert_eq!(set.generations.len(), 2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_unknown_root() {
        let graph = create_test_graph();
        let err = AncestorQuery::from("@I99@").execute(&graph).unwrap_err();
        assert!(matches!(err, GraphError::IndividualNotFound(_)));
    }

    #[test]
    fn test_year_filter_after_walk() {
        let graph = create_test_graph();
        let set = AncestorQuery::from("@I1@")
            .years(YearRange::between(Some(1860), None))
            .execute(&graph)
            .unwrap();

        // I2's parents are still reached, then I4 and I6 are dropped
        assert_eq!(set.ids().len(), 4);
        assert!(set.contains(&"@I5@".into()));
        assert_eq!(set.excluded, ids(&["@I4@", "@I6@"]));
    }

    #[test]
    fn test_year_filter_excluding_undated() {
        let graph = create_test_graph();
        let set = AncestorQuery::from("@I1@")
            .years(YearRange::between(Some(1800), None).exclude_undated())
            .execute(&graph)
            .unwrap();
        assert!(!set.contains(&"@I5@".into()));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_with_relations() {
        let graph = create_test_graph();
        let set = AncestorQuery::from("@I1@")
            .with_relations(true)
            .execute(&graph)
            .unwrap();
        assert_eq!(set.relations, ids(&["@I7@", "@I8@"]));
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_self_parent_cycle_terminates() {
        let mut graph = create_test_graph();
        // I4 erroneously listed as their own parent
        graph.add_family(family("@F9@", &["@I4@"], &["@I4@"]));

        let set = AncestorQuery::from("@I1@").execute(&graph).unwrap();
        assert_eq!(set.len(), 6);
        assert_eq!(
            set.cycles,
            vec![Cycle {
                descendant: "@I4@".into(),
                ancestor: "@I4@".into()
            }]
        );
    }

    #[test]
    fn test_back_edge_ignored() {
        let clean = AncestorQuery::from("@I1@")
            .execute(&create_test_graph())
            .unwrap();

        let mut graph = create_test_graph();
        // I1 listed as a parent of their own grandparent I4
        graph.add_family(family("@F9@", &["@I1@"], &["@I4@"]));
        let looped = AncestorQuery::from("@I1@").execute(&graph).unwrap();

        assert_eq!(looped.ids(), clean.ids());
        assert_eq!(looped.cycles.len(), 1);
        assert_eq!(looped.cycles[0].ancestor, IndividualId::from("@I1@"));
    }

    #[test]
    fn test_pedigree_collapse_is_not_a_cycle() {
        let mut graph = create_test_graph();
        // I6 is also a parent of I2: reached twice, but not a loop
        graph.add_family(family("@F5@", &["@I6@"], &["@I2@"]));

        let set = AncestorQuery::from("@I1@").execute(&graph).unwrap();
        assert_eq!(set.len(), 6);
        assert!(set.cycles.is_empty());
    }
}
