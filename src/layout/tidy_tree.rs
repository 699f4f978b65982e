//! Reingold-Tilford tidy tree pass over the visible hierarchy.
//!
//! Produces the first horizontal placement of every visible node. Subtrees
//! are merged left to right by comparing their contours level by level, so
//! no subtree ever crosses a neighbour at any depth.
//!
//! # Algorithm Overview
//!
//! 1. **First walk (bottom-up):** for every node, place its children's
//!    subtrees side by side as close as the separation function allows, then
//!    center the node (or the couple it forms with its partner) over its
//!    first and last child. Records each child's offset from its parent and
//!    the merged left/right contour of the subtree.
//! 2. **Second walk (top-down):** accumulate offsets into absolute x.
//!
//! Contours are stored explicitly per subtree, O(n * height) memory.

use crate::graph::{NodeRole, TreeNode};

use super::params::LayoutParams;

/// Arena copy of one visible node.
#[derive(Debug)]
pub(super) struct LayoutNode {
    /// Depth in the tree (synthetic root = 0).
    pub depth: usize,
    /// Parent layout index (None for the root).
    pub parent: Option<usize>,
    /// Visible children, in display order.
    pub children: Vec<usize>,
    pub role: NodeRole,
    pub has_partner: bool,
    /// Horizontal position of the primary slot.
    pub x: f32,
    /// Offset from the parent's x (from the first walk).
    offset: f32,
}

/// Extreme node of a subtree at one depth, x relative to the subtree root.
type ContourPoint = (f32, usize);

#[derive(Debug, Default)]
struct Contour {
    left: Vec<ContourPoint>,
    right: Vec<ContourPoint>,
}

/// Visible tree flattened in pre-order; index 0 is the root.
#[derive(Debug)]
pub(super) struct LayoutTree {
    pub nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    /// Flatten the visible part of `root`. Hidden children are skipped.
    pub fn from_tree(root: &TreeNode) -> Self {
        let mut nodes: Vec<LayoutNode> = Vec::with_capacity(root.count());
        let mut stack = vec![(root, None, 0)];
        while let Some((node, parent, depth)) = stack.pop() {
            let index = nodes.len();
            nodes.push(LayoutNode {
                depth,
                parent,
                children: Vec::with_capacity(node.children.len()),
                role: node.role,
                has_partner: node.has_partner(),
                x: 0.0,
                offset: 0.0,
            });
            if let Some(p) = parent {
                nodes[p].children.push(index);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, Some(index), depth + 1)));
        }
        Self { nodes }
    }

    /// Copy positions back onto `root`, visiting it in the same pre-order.
    /// Hidden subtrees lose their stale coordinates.
    pub fn write_back(&self, root: &mut TreeNode, params: &LayoutParams) {
        let mut stack = vec![root];
        for layout in &self.nodes {
            let Some(node) = stack.pop() else {
                break;
            };
            node.x = Some(layout.x);
            node.y = Some(layout.depth as f32 * params.generation_spacing_v);
            for hidden in &mut node.hidden_children {
                hidden.clear_positions();
            }
            stack.extend(node.children.iter_mut().rev());
        }
    }

    /// Non-root node indices grouped by depth, each group in pre-order.
    pub fn generations(&self) -> Vec<Vec<usize>> {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let mut generations = vec![Vec::new(); max_depth + 1];
        for (index, node) in self.nodes.iter().enumerate() {
            if node.role != NodeRole::Root {
                generations[node.depth].push(index);
            }
        }
        generations
    }

    #[inline]
    fn are_siblings(&self, a: usize, b: usize) -> bool {
        self.nodes[a].parent.is_some() && self.nodes[a].parent == self.nodes[b].parent
    }
}

/// The tidy tree pass.
pub(super) struct TidyTreeLayout<'p> {
    params: &'p LayoutParams,
}

impl<'p> TidyTreeLayout<'p> {
    pub fn new(params: &'p LayoutParams) -> Self {
        Self { params }
    }

    /// Assign x to every node of `tree`; the root lands on x = 0.
    pub fn compute(&self, tree: &mut LayoutTree) {
        if tree.nodes.is_empty() {
            return;
        }
        self.first_walk(tree);
        Self::second_walk(tree);
    }

    /// Bottom-up: reverse pre-order visits every child before its parent.
    fn first_walk(&self, tree: &mut LayoutTree) {
        let mut contours: Vec<Contour> = (0..tree.nodes.len()).map(|_| Contour::default()).collect();

        for v in (0..tree.nodes.len()).rev() {
            let children = std::mem::take(&mut tree.nodes[v].children);

            let Some((&first, rest)) = children.split_first() else {
                contours[v] = Contour {
                    left: vec![(0.0, v)],
                    right: vec![(0.0, v)],
                };
                continue;
            };

            let Contour {
                left: mut acc_left,
                right: mut acc_right,
            } = std::mem::take(&mut contours[first]);
            let mut offsets = Vec::with_capacity(children.len());
            offsets.push(0.0f32);

            for &child in rest {
                let Contour { left, right } = std::mem::take(&mut contours[child]);
                let shift = self.separate(tree, &acc_right, &left);
                offsets.push(shift);

                for (depth, (&(rx, rn), &(lx, ln))) in right.iter().zip(&left).enumerate() {
                    let shifted_right = (rx + shift, rn);
                    if depth < acc_right.len() {
                        acc_right[depth] = shifted_right;
                    } else {
                        acc_right.push(shifted_right);
                        acc_left.push((lx + shift, ln));
                    }
                }
            }

            // Center the node, or the couple, over its outermost children
            let midpoint = (offsets[0] + offsets[offsets.len() - 1]) / 2.0;
            let base = midpoint - self.params.partner_anchor(tree.nodes[v].has_partner);

            for (&child, &offset) in children.iter().zip(&offsets) {
                tree.nodes[child].offset = offset - base;
            }

            let mut left = Vec::with_capacity(acc_left.len() + 1);
            left.push((0.0, v));
            left.extend(acc_left.into_iter().map(|(x, n)| (x - base, n)));
            let mut right = Vec::with_capacity(acc_right.len() + 1);
            right.push((0.0, v));
            right.extend(acc_right.into_iter().map(|(x, n)| (x - base, n)));
            contours[v] = Contour { left, right };

            tree.nodes[v].children = children;
        }
    }

    /// Smallest shift of the right subtree that keeps every level apart.
    fn separate(&self, tree: &LayoutTree, right_contour: &[ContourPoint], left_contour: &[ContourPoint]) -> f32 {
        right_contour
            .iter()
            .zip(left_contour)
            .map(|(&(rx, rn), &(lx, ln))| {
                let gap = self.params.separation(
                    tree.are_siblings(rn, ln),
                    tree.nodes[rn].has_partner,
                    tree.nodes[ln].has_partner,
                );
                rx + gap - lx
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Top-down: pre-order visits every parent before its children.
    fn second_walk(tree: &mut LayoutTree) {
        tree.nodes[0].x = 0.0;
        for v in 1..tree.nodes.len() {
            if let Some(parent) = tree.nodes[v].parent {
                tree.nodes[v].x = tree.nodes[parent].x + tree.nodes[v].offset;
            }
        }
    }
}
