//! Per-generation passes run after the tidy tree.
//!
//! - **Overlap sweep:** every partnered node occupies two slots, `x` and
//!   `x + partnerDistance`. One stable left-to-right sweep per generation
//!   pushes all later slots right whenever two occupied slots come closer
//!   than the minimum slot spacing.
//! - **Parent centering:** shifts a parent's children so their outermost
//!   midpoint sits under the parent, or under the middle of the couple.

use super::params::LayoutParams;
use super::tidy_tree::LayoutTree;

/// Sweep one generation left to right, resolving slot overlaps.
///
/// Returns the total distance the rightmost node was pushed.
pub(super) fn resolve_overlaps(tree: &mut LayoutTree, generation: &[usize], params: &LayoutParams) -> f32 {
    let mut order = generation.to_vec();
    // Stable: nodes sharing an x keep their tree order
    order.sort_by(|&a, &b| tree.nodes[a].x.total_cmp(&tree.nodes[b].x));

    let min_spacing = params.min_slot_spacing();
    let mut push = 0.0f32;
    let mut prev_right: Option<f32> = None;

    for index in order {
        let node = &mut tree.nodes[index];
        node.x += push;
        if let Some(right) = prev_right {
            let deficit = right + min_spacing - node.x;
            if deficit > 0.0 {
                node.x += deficit;
                push += deficit;
            }
        }
        prev_right = Some(node.x + params.partner_extent(node.has_partner));
    }
    push
}

/// Distance to move a set of children so their outermost midpoint lands
/// under the parent's center.
///
/// The center of a couple is halfway between the two slots.
pub(super) fn centering_delta(
    parent_x: f32,
    has_partner: bool,
    children_x: impl IntoIterator<Item = f32>,
    params: &LayoutParams,
) -> Option<f32> {
    let (min, max) = children_x
        .into_iter()
        .fold(None, |acc: Option<(f32, f32)>, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })?;
    let center = parent_x + params.partner_anchor(has_partner);
    Some(center - (min + max) / 2.0)
}

/// Center the visible children of `parent` under it.
pub(super) fn center_children(tree: &mut LayoutTree, parent: usize, params: &LayoutParams) {
    let node = &tree.nodes[parent];
    let children_x = node.children.iter().map(|&c| tree.nodes[c].x);
    let Some(delta) = centering_delta(node.x, node.has_partner, children_x, params) else {
        return;
    };
    if delta == 0.0 {
        return;
    }

    let children = std::mem::take(&mut tree.nodes[parent].children);
    for &child in &children {
        tree.nodes[child].x += delta;
    }
    tree.nodes[parent].children = children;
}
