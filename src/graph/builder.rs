//! Hierarchy construction from flat person records.
//!
//! Turns the relational list into a rooted forest under a synthetic root:
//!
//! 1. **Roots:** every person who is nobody's child, in input order.
//! 2. **Descent:** each root is expanded depth-first. A person's primary
//!    partner is attached as a display-only field and the couple's children
//!    are appended in three groups: common children, children of the person
//!    only, children of the partner only.
//! 3. **De-duplication:** a person reachable through several relations is
//!    materialized once, under the first ancestor that reaches them.
//!
//! Two visited sets are threaded through the recursion. The per-path set is
//! copied into each branch and stops descent on cyclic data. The placed set
//! is shared by the whole build and never outlives it.

use std::collections::HashSet;

use log::{debug, warn};

use super::kinship::KinshipIndex;
use super::node::TreeNode;
use super::person::{Person, PersonId};
use crate::error::{DataWarning, Error, Result};

/// A built hierarchy plus the data findings collected on the way.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub tree: TreeNode,
    pub warnings: Vec<DataWarning>,
}

/// Build the forest for `people` under a synthetic root labelled `root_label`.
///
/// Fails with [`Error::MalformedGraph`] when the input is non-empty but no
/// person qualifies as a root. Broken references never fail the build.
pub fn build(people: &[Person], root_label: &str) -> Result<BuildOutcome> {
    let index = KinshipIndex::new(people);
    let roots = index.roots();

    if roots.is_empty() && !index.is_empty() {
        return Err(Error::MalformedGraph {
            people: index.len(),
        });
    }

    let mut tree = TreeNode::root(root_label);
    let mut placed: HashSet<PersonId> = HashSet::with_capacity(index.len());

    for root in roots {
        if placed.contains(&root.id) {
            continue;
        }
        if let Some(node) = descend(&index, root, HashSet::new(), &mut placed) {
            tree.children.push(node);
        }
    }

    let cyclic = index.has_cycle();
    let mut warnings = index.into_warnings();
    if cyclic {
        warnings.push(DataWarning::CycleDetected);
    }

    let mut unreachable = HashSet::new();
    for person in people {
        if !placed.contains(&person.id) && unreachable.insert(&person.id) {
            warnings.push(DataWarning::Unreachable {
                id: person.id.clone(),
            });
        }
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    debug!(
        "built hierarchy: {} people placed, {} forest roots, {} warnings",
        placed.len(),
        tree.children.len(),
        warnings.len()
    );

    Ok(BuildOutcome { tree, warnings })
}

/// Materialize `person` and the descendants nobody has claimed yet.
fn descend(
    index: &KinshipIndex<'_>,
    person: &Person,
    mut path: HashSet<PersonId>,
    placed: &mut HashSet<PersonId>,
) -> Option<TreeNode> {
    if !path.insert(person.id.clone()) {
        debug!("cycle through {} cut", person.id);
        return None;
    }
    placed.insert(person.id.clone());

    let mut node = TreeNode::person(person);

    let partner = person
        .primary_partner_id()
        .filter(|id| **id != person.id)
        .and_then(|id| index.person(id))
        .filter(|partner| {
            let free = !placed.contains(&partner.id);
            if !free {
                debug!(
                    "{} already placed, not shown again as partner of {}",
                    partner.id, person.id
                );
            }
            free
        });

    let Some(partner) = partner else {
        for child in index.children_of(&person.id) {
            if placed.contains(&child.id) {
                continue;
            }
            if let Some(child_node) = descend(index, child, path.clone(), placed) {
                node.children.push(child_node);
            }
        }
        return Some(node);
    };

    node.partner = Some(partner.clone());
    placed.insert(partner.id.clone());

    let own = index.children_of(&person.id);
    let theirs = index.children_of(&partner.id);

    let common = own.iter().filter(|c| partner.has_child(&c.id));
    let own_only = own.iter().filter(|c| !partner.has_child(&c.id));
    let theirs_only = theirs.iter().filter(|c| !person.has_child(&c.id));

    let groups = common
        .map(|c| (*c, None))
        .chain(own_only.map(|c| (*c, Some(&person.id))))
        .chain(theirs_only.map(|c| (*c, Some(&partner.id))));

    for (child, origin) in groups {
        if placed.contains(&child.id) {
            continue;
        }
        if let Some(mut child_node) = descend(index, child, path.clone(), placed) {
            child_node.is_from_other_union = origin.is_some();
            child_node.origin_parent_id = origin.cloned();
            node.children.push(child_node);
        }
    }

    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_ids(node: &TreeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input_builds_empty_root() {
        let outcome = build(&[], "Family").unwrap();
        assert!(outcome.tree.is_root());
        assert!(outcome.tree.children.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_blended_family_partition() {
        let people = vec![
            Person::new("A", "Alice", "X")
                .with_partners(["B"])
                .with_children(["C", "E"]),
            Person::new("B", "Bob", "Y")
                .with_partners(["A"])
                .with_children(["D", "E"]),
            Person::new("C", "Cleo", "X"),
            Person::new("D", "Dan", "Y"),
            Person::new("E", "Eve", "X"),
        ];
        let tree = build(&people, "Family").unwrap().tree;

        assert_eq!(child_ids(&tree), vec!["A"]);
        let a = &tree.children[0];
        assert_eq!(a.partner_id(), Some(&PersonId::from("B")));
        assert_eq!(child_ids(a), vec!["E", "C", "D"]);

        let (e, c, d) = (&a.children[0], &a.children[1], &a.children[2]);
        assert!(!e.is_from_other_union);
        assert_eq!(e.origin_parent_id, None);
        assert!(c.is_from_other_union);
        assert_eq!(c.origin_parent_id, Some(PersonId::from("A")));
        assert!(d.is_from_other_union);
        assert_eq!(d.origin_parent_id, Some(PersonId::from("B")));
    }

    #[test]
    fn test_partner_root_not_materialized_twice() {
        // Both spouses are roots; only the first becomes a node
        let people = vec![
            Person::new("h", "Hugo", "X").with_partners(["w"]).with_children(["k"]),
            Person::new("w", "Wen", "Y").with_partners(["h"]).with_children(["k"]),
            Person::new("k", "Kai", "X"),
        ];
        let tree = build(&people, "Family").unwrap().tree;

        assert_eq!(child_ids(&tree), vec!["h"]);
        assert_eq!(child_ids(&tree.children[0]), vec!["k"]);
    }

    #[test]
    fn test_child_reached_twice_placed_once() {
        // k is co-parented by two unrelated roots
        let people = vec![
            Person::new("p1", "P", "One").with_children(["k"]),
            Person::new("p2", "P", "Two").with_children(["k"]),
            Person::new("k", "K", "One"),
        ];
        let tree = build(&people, "Family").unwrap().tree;

        assert_eq!(child_ids(&tree), vec!["p1", "p2"]);
        assert_eq!(child_ids(&tree.children[0]), vec!["k"]);
        assert!(tree.children[1].children.is_empty());
    }

    #[test]
    fn test_placed_partner_not_attached_again() {
        // m is r1's child, and r2's primary partner
        let people = vec![
            Person::new("r1", "R", "One").with_children(["m"]),
            Person::new("m", "M", "One"),
            Person::new("r2", "R", "Two").with_partners(["m"]).with_children(["x"]),
            Person::new("x", "X", "Two"),
        ];
        let tree = build(&people, "Family").unwrap().tree;

        let r2 = tree.find(&"r2".into()).unwrap();
        assert!(r2.partner.is_none());
        assert_eq!(child_ids(r2), vec!["x"]);
        assert!(!r2.children[0].is_from_other_union);
    }

    #[test]
    fn test_dangling_partner_treated_as_absent() {
        let people = vec![
            Person::new("a", "A", "X")
                .with_partners(["ghost"])
                .with_children(["b", "missing"]),
            Person::new("b", "B", "X"),
        ];
        let outcome = build(&people, "Family").unwrap();
        let a = &outcome.tree.children[0];

        assert!(a.partner.is_none());
        assert_eq!(child_ids(a), vec!["b"]);
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[test]
    fn test_secondary_partner_ignored() {
        let people = vec![
            Person::new("a", "A", "X").with_partners(["b", "c"]),
            Person::new("b", "B", "X"),
            Person::new("c", "C", "X"),
        ];
        let tree = build(&people, "Family").unwrap().tree;

        assert_eq!(child_ids(&tree), vec!["a", "c"]);
        assert_eq!(tree.children[0].partner_id(), Some(&PersonId::from("b")));
    }

    #[test]
    fn test_full_cycle_is_malformed() {
        let people = vec![
            Person::new("a", "A", "X").with_children(["b"]),
            Person::new("b", "B", "X").with_children(["a"]),
        ];
        let err = build(&people, "Family").unwrap_err();
        assert!(matches!(err, Error::MalformedGraph { people: 2 }));
    }

    #[test]
    fn test_partial_cycle_reported() {
        // r is a root; a and b only point at each other
        let people = vec![
            Person::new("r", "R", "X"),
            Person::new("a", "A", "X").with_children(["b"]),
            Person::new("b", "B", "X").with_children(["a"]),
        ];
        let outcome = build(&people, "Family").unwrap();

        assert_eq!(child_ids(&outcome.tree), vec!["r"]);
        assert!(outcome.warnings.contains(&DataWarning::CycleDetected));
        assert!(outcome.warnings.contains(&DataWarning::Unreachable { id: "a".into() }));
        assert!(outcome.warnings.contains(&DataWarning::Unreachable { id: "b".into() }));
    }

    #[test]
    fn test_partner_who_is_also_a_child_not_redescended() {
        let people = vec![
            Person::new("a", "A", "X").with_partners(["b"]).with_children(["b", "c"]),
            Person::new("b", "B", "X").with_children(["d"]),
            Person::new("c", "C", "X"),
            Person::new("d", "D", "X"),
        ];
        let tree = build(&people, "Family").unwrap().tree;
        let a = &tree.children[0];

        assert_eq!(a.partner_id(), Some(&PersonId::from("b")));
        assert_eq!(child_ids(a), vec!["c", "d"]);
        assert_eq!(tree.count(), 4);
    }

    #[test]
    fn test_built_nodes_are_expanded_and_unpositioned() {
        let people = vec![
            Person::new("a", "A", "X").with_children(["b"]),
            Person::new("b", "B", "X"),
        ];
        let tree = build(&people, "Family").unwrap().tree;
        let a = &tree.children[0];

        assert!(a.is_expanded());
        assert!(a.hidden_children.is_empty());
        assert!(a.position().is_none());
    }
}
