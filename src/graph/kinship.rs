//! KinshipIndex - parent/child topology over a slice of person records.
//!
//! Stores the parent → child edges (taken from `childrenIds`) in petgraph's
//! StableGraph and keeps an id map for O(1) person lookup. Broken references
//! are dropped while indexing and recorded as [`DataWarning`]s.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};

use super::person::{Person, PersonId, Relation};
use crate::error::DataWarning;

/// Lookup and topology queries over one person list.
///
/// Borrows the records; one index lives for the duration of a single build.
pub struct KinshipIndex<'a> {
    /// Node weights are indices into `people`.
    graph: StableGraph<usize, (), Directed>,

    /// Map from person id to petgraph NodeIndex (first record wins).
    id_to_index: HashMap<&'a PersonId, NodeIndex>,

    /// Person records in input order.
    people: &'a [Person],

    /// Findings collected while indexing.
    warnings: Vec<DataWarning>,
}

impl<'a> KinshipIndex<'a> {
    /// Index `people`, dropping broken references.
    pub fn new(people: &'a [Person]) -> Self {
        let mut index = Self {
            graph: StableGraph::with_capacity(people.len(), people.len()),
            id_to_index: HashMap::with_capacity(people.len()),
            people,
            warnings: Vec::new(),
        };

        for (slot, person) in people.iter().enumerate() {
            if index.id_to_index.contains_key(&person.id) {
                index.warnings.push(DataWarning::DuplicatePerson {
                    id: person.id.clone(),
                });
                continue;
            }
            let node = index.graph.add_node(slot);
            index.id_to_index.insert(&person.id, node);
        }

        for (slot, person) in people.iter().enumerate() {
            // Shadowed duplicates would have their edges attributed twice
            let Some(source) = index.indexed_slot(slot, person) else {
                continue;
            };

            let mut seen_children = HashSet::new();
            for child_id in &person.children_ids {
                if child_id == &person.id {
                    index.warn_self(person, Relation::Child);
                    continue;
                }
                match index.id_to_index.get(child_id) {
                    Some(&target) => {
                        if seen_children.insert(target) {
                            index.graph.add_edge(source, target, ());
                        }
                    }
                    None => index.warn_dangling(person, child_id, Relation::Child),
                }
            }

            for partner_id in &person.partner_ids {
                if partner_id == &person.id {
                    index.warn_self(person, Relation::Partner);
                } else if !index.id_to_index.contains_key(partner_id) {
                    index.warn_dangling(person, partner_id, Relation::Partner);
                }
            }
        }

        // Declared parents are only checked against childrenIds; the
        // topology always comes from the forward edges.
        for (slot, person) in people.iter().enumerate() {
            if index.indexed_slot(slot, person).is_none() {
                continue;
            }
            for parent_id in &person.parents_ids {
                match index.person(parent_id) {
                    Some(parent) if !parent.has_child(&person.id) => {
                        index.warnings.push(DataWarning::ParentMismatch {
                            child: person.id.clone(),
                            parent: parent_id.clone(),
                        });
                    }
                    Some(_) => {}
                    None => index.warn_dangling(person, parent_id, Relation::Parent),
                }
            }
        }

        index
    }

    /// Node of the record at `slot`, unless a duplicate id shadowed it.
    fn indexed_slot(&self, slot: usize, person: &Person) -> Option<NodeIndex> {
        self.id_to_index
            .get(&person.id)
            .copied()
            .filter(|&node| self.graph[node] == slot)
    }

    fn warn_dangling(&mut self, from: &Person, missing: &PersonId, relation: Relation) {
        self.warnings.push(DataWarning::DanglingReference {
            from: from.id.clone(),
            missing: missing.clone(),
            relation,
        });
    }

    fn warn_self(&mut self, person: &Person, relation: Relation) {
        self.warnings.push(DataWarning::SelfReference {
            id: person.id.clone(),
            relation,
        });
    }

    /// Number of distinct people.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up a person by id.
    pub fn person(&self, id: &PersonId) -> Option<&'a Person> {
        self.id_to_index
            .get(id)
            .map(|&index| &self.people[self.graph[index]])
    }

    /// People listed as nobody's child, in input order.
    pub fn roots(&self) -> Vec<&'a Person> {
        let mut roots: Vec<(usize, &'a Person)> = self
            .graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|index| {
                let slot = self.graph[index];
                (slot, &self.people[slot])
            })
            .collect();
        roots.sort_by_key(|&(slot, _)| slot);
        roots.into_iter().map(|(_, person)| person).collect()
    }

    /// Parents derived from every `childrenIds` list naming `id`.
    pub fn parents_of(&self, id: &PersonId) -> Vec<&'a Person> {
        self.related(id, Direction::Incoming)
    }

    /// Resolvable children of `id`, deduplicated, in declaration order.
    pub fn children_of(&self, id: &PersonId) -> Vec<&'a Person> {
        let Some(person) = self.person(id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        person
            .children_ids
            .iter()
            .filter(|child_id| *child_id != id && seen.insert(*child_id))
            .filter_map(|child_id| self.person(child_id))
            .collect()
    }

    fn related(&self, id: &PersonId, direction: Direction) -> Vec<&'a Person> {
        let Some(&index) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        let mut related: Vec<(usize, &'a Person)> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|n| {
                let slot = self.graph[n];
                (slot, &self.people[slot])
            })
            .collect();
        related.sort_by_key(|&(slot, _)| slot);
        related.into_iter().map(|(_, person)| person).collect()
    }

    /// Whether some person is their own ancestor.
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Findings collected while indexing.
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<DataWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(people: &[&Person]) -> Vec<String> {
        people.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_roots_in_input_order() {
        let people = vec![
            Person::new("c", "C", "X"),
            Person::new("a", "A", "X").with_children(["c"]),
            Person::new("b", "B", "Y"),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(index.len(), 3);
        assert_eq!(ids(&index.roots()), vec!["a", "b"]);
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn test_parents_of_uses_children_lists() {
        let people = vec![
            Person::new("mum", "M", "X").with_children(["kid"]),
            Person::new("dad", "D", "X").with_children(["kid"]),
            Person::new("kid", "K", "X"),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(ids(&index.parents_of(&"kid".into())), vec!["mum", "dad"]);
        assert!(index.parents_of(&"mum".into()).is_empty());
        assert!(index.parents_of(&"nobody".into()).is_empty());
    }

    #[test]
    fn test_dangling_references_warned() {
        let people = vec![
            Person::new("a", "A", "X")
                .with_children(["ghost", "b"])
                .with_partners(["phantom"]),
            Person::new("b", "B", "X").with_parents(["a", "nobody"]),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(ids(&index.children_of(&"a".into())), vec!["b"]);
        assert_eq!(
            index.warnings(),
            &[
                DataWarning::DanglingReference {
                    from: "a".into(),
                    missing: "ghost".into(),
                    relation: Relation::Child,
                },
                DataWarning::DanglingReference {
                    from: "a".into(),
                    missing: "phantom".into(),
                    relation: Relation::Partner,
                },
                DataWarning::DanglingReference {
                    from: "b".into(),
                    missing: "nobody".into(),
                    relation: Relation::Parent,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_person_first_wins() {
        let people = vec![
            Person::new("a", "First", "X"),
            Person::new("a", "Second", "X").with_children(["b"]),
            Person::new("b", "B", "X"),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(index.len(), 2);
        assert_eq!(index.person(&"a".into()).unwrap().first_name, "First");
        // The shadowed record's edges are not indexed, so b stays a root
        assert_eq!(ids(&index.roots()), vec!["a", "b"]);
        assert_eq!(
            index.warnings(),
            &[DataWarning::DuplicatePerson { id: "a".into() }]
        );
    }

    #[test]
    fn test_shadowed_duplicate_parents_not_checked() {
        let people = vec![
            Person::new("p", "P", "X").with_children(["c"]),
            Person::new("c", "C", "X").with_parents(["p"]),
            Person::new("c", "Shadow", "X").with_parents(["q", "ghost"]),
            Person::new("q", "Q", "X"),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(
            index.warnings(),
            &[DataWarning::DuplicatePerson { id: "c".into() }]
        );
    }

    #[test]
    fn test_self_reference_dropped() {
        let people = vec![
            Person::new("a", "A", "X")
                .with_children(["a"])
                .with_partners(["a"]),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(ids(&index.roots()), vec!["a"]);
        assert!(!index.has_cycle());
        assert_eq!(index.warnings().len(), 2);
    }

    #[test]
    fn test_parent_mismatch() {
        let people = vec![
            Person::new("p", "P", "X"),
            Person::new("c", "C", "X").with_parents(["p"]),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(
            index.warnings(),
            &[DataWarning::ParentMismatch {
                child: "c".into(),
                parent: "p".into(),
            }]
        );
    }

    #[test]
    fn test_cycle_detection() {
        let people = vec![
            Person::new("a", "A", "X").with_children(["b"]),
            Person::new("b", "B", "X").with_children(["a"]),
        ];
        let index = KinshipIndex::new(&people);

        assert!(index.has_cycle());
        assert!(index.roots().is_empty());
    }

    #[test]
    fn test_repeated_child_indexed_once() {
        let people = vec![
            Person::new("a", "A", "X").with_children(["b", "b"]),
            Person::new("b", "B", "X"),
        ];
        let index = KinshipIndex::new(&people);

        assert_eq!(ids(&index.children_of(&"a".into())), vec!["b"]);
        assert_eq!(ids(&index.parents_of(&"b".into())), vec!["a"]);
    }
}
