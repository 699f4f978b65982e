//! Collapse and expand toggles on a built tree.
//!
//! A toggle never edits the caller's tree: it deep-copies it, flips one
//! node between its expanded and collapsed states, and hands the copy back.
//! Coordinates are left as they were; the caller re-runs
//! [`layout`](crate::layout::layout) on the result.

use log::debug;
use serde::Serialize;

use crate::graph::{PersonId, TreeNode};

/// What a toggle did to the targeted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleOutcome {
    /// Its children were moved to `hidden_children`.
    Collapsed,
    /// Its hidden children were restored.
    Expanded,
    /// Found, but it has no children to toggle.
    Unchanged,
    /// No node carries this id.
    NotFound,
}

/// Flip `target` in a copy of `root`. A stale id yields an unchanged copy.
pub fn toggle(root: &TreeNode, target: &PersonId) -> TreeNode {
    toggle_with_outcome(root, target).0
}

/// [`toggle`], also reporting what happened.
pub fn toggle_with_outcome(root: &TreeNode, target: &PersonId) -> (TreeNode, ToggleOutcome) {
    let mut copy = root.clone();
    let outcome = match copy.find_mut(target) {
        Some(node) => flip(node),
        None => {
            debug!("toggle: no node {target}, tree returned unchanged");
            ToggleOutcome::NotFound
        }
    };
    (copy, outcome)
}

/// Locate a node, visible children searched before hidden ones.
pub fn find_node<'a>(root: &'a TreeNode, id: &PersonId) -> Option<&'a TreeNode> {
    root.find(id)
}

fn flip(node: &mut TreeNode) -> ToggleOutcome {
    if !node.children.is_empty() {
        node.hidden_children = std::mem::take(&mut node.children);
        ToggleOutcome::Collapsed
    } else if !node.hidden_children.is_empty() {
        node.children = std::mem::take(&mut node.hidden_children);
        ToggleOutcome::Expanded
    } else {
        ToggleOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Person, build};
    use crate::layout::{LayoutParams, layout};

    fn family() -> TreeNode {
        let people = vec![
            Person::new("a", "A", "X").with_children(["b", "c"]),
            Person::new("b", "B", "X").with_children(["d"]),
            Person::new("c", "C", "X"),
            Person::new("d", "D", "X"),
        ];
        build(&people, "Family").unwrap().tree
    }

    #[test]
    fn test_collapse_moves_children() {
        let tree = family();
        let (copy, outcome) = toggle_with_outcome(&tree, &"b".into());

        assert_eq!(outcome, ToggleOutcome::Collapsed);
        let b = find_node(&copy, &"b".into()).unwrap();
        assert!(b.children.is_empty());
        assert_eq!(b.hidden_children.len(), 1);
        assert!(!b.is_expanded());

        // The input tree is untouched
        assert!(find_node(&tree, &"b".into()).unwrap().is_expanded());
    }

    #[test]
    fn test_round_trip_restores_split() {
        let tree = family();
        let twice = toggle(&toggle(&tree, &"a".into()), &"a".into());
        assert_eq!(twice, tree);
    }

    #[test]
    fn test_leaf_and_stale_ids() {
        let tree = family();
        let (copy, outcome) = toggle_with_outcome(&tree, &"c".into());
        assert_eq!(outcome, ToggleOutcome::Unchanged);
        assert_eq!(copy, tree);

        let (copy, outcome) = toggle_with_outcome(&tree, &"gone".into());
        assert_eq!(outcome, ToggleOutcome::NotFound);
        assert_eq!(copy, tree);
    }

    #[test]
    fn test_node_inside_collapsed_subtree_reachable() {
        let tree = toggle(&family(), &"a".into());
        let (copy, outcome) = toggle_with_outcome(&tree, &"b".into());

        assert_eq!(outcome, ToggleOutcome::Collapsed);
        let a = find_node(&copy, &"a".into()).unwrap();
        assert!(a.hidden_children[0].children.is_empty());
    }

    #[test]
    fn test_relayout_after_collapse_clears_hidden() {
        let params = LayoutParams::default();
        let mut tree = family();
        layout(&mut tree, &params).unwrap();

        let mut collapsed = toggle(&tree, &"b".into());
        // Still carrying the previous coordinates until laid out again
        assert!(find_node(&collapsed, &"d".into()).unwrap().position().is_some());

        layout(&mut collapsed, &params).unwrap();
        assert!(find_node(&collapsed, &"d".into()).unwrap().position().is_none());
        assert!(find_node(&collapsed, &"b".into()).unwrap().position().is_some());
    }
}
