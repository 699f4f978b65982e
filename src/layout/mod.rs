//! Chart layout for built family trees.
//!
//! [`layout`] positions every visible node of a [`TreeNode`] tree in four
//! passes:
//!
//! 1. **Tidy tree:** Reingold-Tilford placement with partner-aware separation
//! 2. **Overlap sweep:** per-generation slot sweep (node and partner slots)
//! 3. **Parent centering:** top-down, children centered under their parent
//!    or couple, each generation re-swept right after it is centered
//! 4. **Write back:** `y = depth * generationSpacingV`, hidden nodes cleared
//!
//! The result is a pure function of the tree shape and the parameters, so
//! running it twice yields identical coordinates.

mod generations;
pub mod links;
mod params;
mod tidy_tree;

use log::debug;
use serde::Serialize;

pub use links::{LinkPath, PartnerLink, PathCommand, parent_child_links, partner_links};
pub use params::{COUSIN_SEPARATION, LayoutParams, SIBLING_SEPARATION};

use crate::error::Result;
use crate::graph::{NodeRole, PersonId, TreeNode};
use generations::{center_children, resolve_overlaps};
use tidy_tree::{LayoutTree, TidyTreeLayout};

/// Position `root` and its visible descendants in place.
///
/// Fails only on invalid parameters, before anything is touched.
pub fn layout(root: &mut TreeNode, params: &LayoutParams) -> Result<()> {
    params.validate()?;

    let mut tree = LayoutTree::from_tree(root);
    TidyTreeLayout::new(params).compute(&mut tree);

    let generations = tree.generations();
    let mut pushed = 0.0f32;
    for generation in &generations {
        pushed += resolve_overlaps(&mut tree, generation, params);
    }

    // Parents are final before their children are centered under them
    for depth in 1..generations.len() {
        for &parent in &generations[depth - 1] {
            center_children(&mut tree, parent, params);
        }
        pushed += resolve_overlaps(&mut tree, &generations[depth], params);
    }

    tree.write_back(root, params);

    debug!(
        "laid out {} visible nodes over {} generations, sweeps pushed {pushed}",
        tree.nodes.len(),
        generations.len().saturating_sub(1),
    );
    Ok(())
}

/// One occupied slot of the chart: a primary node or a displayed partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: PersonId,
    pub role: NodeRole,
    pub x: f32,
    pub y: f32,
    /// Generation, the forest roots being 1.
    pub depth: usize,
    /// The primary node a partner slot belongs to (its own id otherwise).
    pub owner_id: PersonId,
    /// The owner is collapsed.
    pub has_hidden_children: bool,
}

/// Flatten a positioned tree into slots, in pre-order, each partner right
/// after its primary node. The synthetic root and unpositioned nodes are
/// left out.
pub fn placements(root: &TreeNode, params: &LayoutParams) -> Vec<Placement> {
    let mut slots = Vec::new();
    root.visit_visible(&mut |node, depth| {
        if node.is_root() {
            return;
        }
        let Some((x, y)) = node.position() else {
            return;
        };
        let has_hidden_children = !node.is_expanded();
        slots.push(Placement {
            id: node.id.clone(),
            role: node.role,
            x,
            y,
            depth,
            owner_id: node.id.clone(),
            has_hidden_children,
        });
        if let Some(partner) = &node.partner {
            slots.push(Placement {
                id: partner.id.clone(),
                role: NodeRole::DisplayOnlyPartner,
                x: x + params.partner_distance,
                y,
                depth,
                owner_id: node.id.clone(),
                has_hidden_children,
            });
        }
    });
    slots
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of the given slots, grown by
/// `margin` on every side. `None` when there are no slots.
pub fn bounds<'a>(slots: impl IntoIterator<Item = &'a Placement>, margin: f32) -> Option<(f32, f32, f32, f32)> {
    let mut iter = slots.into_iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for slot in iter {
        min_x = min_x.min(slot.x);
        min_y = min_y.min(slot.y);
        max_x = max_x.max(slot.x);
        max_y = max_y.max(slot.y);
    }
    Some((min_x - margin, min_y - margin, max_x + margin, max_y + margin))
}
