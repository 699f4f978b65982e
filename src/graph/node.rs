//! Tree node type and related structures.
//!
//! Tree nodes are the vertices of the displayed hierarchy. Each node has:
//! - The id and record of the person it shows (none for the synthetic root)
//! - An optional display-only partner sharing the node's children
//! - Visible and hidden (collapsed) children
//! - Union marking for children of only one side of a couple
//! - Layout coordinates, absent until the layout engine has run

use serde::Serialize;

use super::person::{Person, PersonId};

/// Id of the synthetic node wrapping every forest root.
pub const ROOT_ID: &str = "root";

/// Role a chart entry plays.
///
/// Layout and link routing dispatch on this instead of probing which
/// optional fields happen to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeRole {
    /// Invisible anchor above the forest roots.
    Root,
    /// A person laid out as a tree node of their own.
    PrimaryDescendant,
    /// A partner drawn beside a primary node, never expanded.
    DisplayOnlyPartner,
}

/// One node of the displayed hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: PersonId,
    pub role: NodeRole,
    /// Display name (the tree label for the synthetic root).
    pub name: String,
    pub data: Option<Person>,
    pub partner: Option<Person>,
    pub children: Vec<TreeNode>,
    pub hidden_children: Vec<TreeNode>,
    pub is_from_other_union: bool,
    /// Which side of the parent couple this child descends from, when it is
    /// not common to both.
    pub origin_parent_id: Option<PersonId>,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl TreeNode {
    /// Create the synthetic root.
    pub fn root(label: &str) -> Self {
        Self {
            id: PersonId::from(ROOT_ID),
            role: NodeRole::Root,
            name: label.to_owned(),
            data: None,
            partner: None,
            children: Vec::new(),
            hidden_children: Vec::new(),
            is_from_other_union: false,
            origin_parent_id: None,
            x: None,
            y: None,
        }
    }

    /// Create an expanded, childless node for `person`.
    pub fn person(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            role: NodeRole::PrimaryDescendant,
            name: person.display_name(),
            data: Some(person.clone()),
            partner: None,
            children: Vec::new(),
            hidden_children: Vec::new(),
            is_from_other_union: false,
            origin_parent_id: None,
            x: None,
            y: None,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.role == NodeRole::Root
    }

    /// Collapsed nodes park their children in `hidden_children`.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.hidden_children.is_empty()
    }

    #[inline]
    pub fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    #[inline]
    pub fn partner_id(&self) -> Option<&PersonId> {
        self.partner.as_ref().map(|p| &p.id)
    }

    /// Position, once laid out.
    #[inline]
    pub fn position(&self) -> Option<(f32, f32)> {
        self.x.zip(self.y)
    }

    /// Depth-first search, visible children before hidden children.
    pub fn find(&self, id: &PersonId) -> Option<&TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if &node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().chain(&node.hidden_children).rev());
        }
        None
    }

    /// Mutable variant of [`TreeNode::find`].
    pub fn find_mut(&mut self, id: &PersonId) -> Option<&mut TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if &node.id == id {
                return Some(node);
            }
            stack.extend(
                node.children
                    .iter_mut()
                    .chain(node.hidden_children.iter_mut())
                    .rev(),
            );
        }
        None
    }

    /// Visit this node and every visible descendant in pre-order.
    pub fn visit_visible<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    /// Number of nodes, hidden ones included.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter().chain(&node.hidden_children));
        }
        count
    }

    /// Forget the coordinates of this node and every descendant.
    pub fn clear_positions(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.x = None;
            node.y = None;
            stack.extend(node.children.iter_mut().chain(node.hidden_children.iter_mut()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> TreeNode {
        let mut root = TreeNode::root("Family");
        let mut a = TreeNode::person(&Person::new("a", "Anne", "Roy"));
        let b = TreeNode::person(&Person::new("b", "Bea", "Roy"));
        let c = TreeNode::person(&Person::new("c", "Cid", "Roy"));
        a.children.push(b);
        a.hidden_children.push(c);
        root.children.push(a);
        root
    }

    #[test]
    fn test_root_node() {
        let root = TreeNode::root("Arbre");
        assert!(root.is_root());
        assert_eq!(root.id.as_str(), ROOT_ID);
        assert_eq!(root.name, "Arbre");
        assert!(root.data.is_none());
        assert!(root.position().is_none());
    }

    #[test]
    fn test_person_node_defaults() {
        let node = TreeNode::person(&Person::new("a", "Anne", "Roy"));
        assert_eq!(node.role, NodeRole::PrimaryDescendant);
        assert_eq!(node.name, "Anne Roy");
        assert!(node.is_expanded());
        assert!(!node.has_partner());
        assert!(!node.is_from_other_union);
    }

    #[test]
    fn test_find_searches_hidden_children() {
        let tree = family();
        assert_eq!(tree.find(&"b".into()).unwrap().name, "Bea Roy");
        assert_eq!(tree.find(&"c".into()).unwrap().name, "Cid Roy");
        assert!(tree.find(&"zz".into()).is_none());
        assert_eq!(tree.count(), 4);
    }

    #[test]
    fn test_visit_visible_skips_hidden() {
        let tree = family();
        let mut seen = Vec::new();
        tree.visit_visible(&mut |node, depth| seen.push((node.id.to_string(), depth)));
        assert_eq!(
            seen,
            vec![
                ("root".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_find_order_and_clear() {
        let mut tree = family();
        // Same id visible and hidden: the visible one is found first
        tree.children[0]
            .hidden_children
            .push(TreeNode::person(&Person::new("b", "Shadow", "Roy")));
        assert_eq!(tree.find(&"b".into()).unwrap().name, "Bea Roy");

        tree.find_mut(&"c".into()).unwrap().x = Some(5.0);
        tree.children[0].y = Some(1.0);
        tree.clear_positions();
        assert!(tree.find(&"c".into()).unwrap().x.is_none());
        assert!(tree.children[0].position().is_none());
    }

    #[test]
    fn test_walks_handle_long_chains() {
        let mut tree = TreeNode::root("Family");
        let mut tip = &mut tree;
        for i in 0..2_000 {
            tip.children.push(TreeNode::person(&Person::new(format!("p{i}"), "P", "X")));
            tip = &mut tip.children[0];
        }
        assert_eq!(tree.count(), 2_001);

        let mut deepest = 0;
        tree.visit_visible(&mut |_, depth| deepest = deepest.max(depth));
        assert_eq!(deepest, 2_000);

        tree.find_mut(&"p1999".into()).unwrap().x = Some(1.0);
        assert_eq!(tree.find(&"p1999".into()).unwrap().x, Some(1.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let node = TreeNode::person(&Person::new("a", "Anne", "Roy"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["role"], "primaryDescendant");
        assert_eq!(json["isFromOtherUnion"], false);
        assert!(json["hiddenChildren"].as_array().unwrap().is_empty());
        assert!(json["x"].is_null());
    }
}
