//! Connector geometry for a positioned chart.
//!
//! Parent to child connectors are orthogonal paths: down from the parent to
//! the middle of the generation gap, across to the child, down to the child.
//! Where the connector starts depends on which side of the couple the child
//! descends from:
//!
//! - child of the displayed partner only: the partner slot
//! - child of the primary node only: the primary slot
//! - common child of a couple: halfway between the two slots
//! - child of a single parent: the parent's slot

use serde::Serialize;

use super::params::LayoutParams;
use crate::graph::{PersonId, TreeNode};

/// One segment command of a connector path, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    VerticalTo { y: f32 },
    HorizontalTo { x: f32 },
}

/// Connector from a parent (or couple) to one child.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPath {
    pub source_id: PersonId,
    pub target_id: PersonId,
    /// The child belongs to only one side of the couple.
    pub other_union: bool,
    pub commands: Vec<PathCommand>,
}

impl LinkPath {
    /// Render as an SVG path `d` attribute.
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            match command {
                PathCommand::MoveTo { x, y } => d.push_str(&format!("M{x},{y}")),
                PathCommand::VerticalTo { y } => d.push_str(&format!("V{y}")),
                PathCommand::HorizontalTo { x } => d.push_str(&format!("H{x}")),
            }
        }
        d
    }
}

/// Horizontal line joining a primary node to its displayed partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLink {
    pub owner_id: PersonId,
    pub partner_id: PersonId,
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// Connectors for every visible parent/child pair of a positioned tree.
///
/// Children of the synthetic root get none; nodes without coordinates are
/// skipped.
pub fn parent_child_links(root: &TreeNode, params: &LayoutParams) -> Vec<LinkPath> {
    let mut links = Vec::new();
    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        if !parent.is_root() {
            links.extend(
                parent
                    .children
                    .iter()
                    .filter_map(|child| link_path(parent, child, params)),
            );
        }
        stack.extend(parent.children.iter().rev());
    }
    links
}

/// Horizontal start of the connector from `parent` to `child`.
pub fn link_start_x(parent: &TreeNode, parent_x: f32, child: &TreeNode, params: &LayoutParams) -> f32 {
    match (&child.origin_parent_id, parent.partner_id()) {
        (Some(origin), Some(partner)) if origin == partner => parent_x + params.partner_distance,
        (Some(_), _) => parent_x,
        (None, Some(_)) => parent_x + params.partner_anchor(true),
        (None, None) => parent_x,
    }
}

fn link_path(parent: &TreeNode, child: &TreeNode, params: &LayoutParams) -> Option<LinkPath> {
    let (px, py) = parent.position()?;
    let (cx, cy) = child.position()?;
    let start_x = link_start_x(parent, px, child, params);

    let mut commands = vec![PathCommand::MoveTo { x: start_x, y: py }];
    if (cx - start_x).abs() < params.node_radius * 0.5 {
        commands.push(PathCommand::VerticalTo { y: cy });
    } else {
        let mid_y = (py + cy) / 2.0;
        commands.push(PathCommand::VerticalTo { y: mid_y });
        commands.push(PathCommand::HorizontalTo { x: cx });
        commands.push(PathCommand::VerticalTo { y: cy });
    }

    Some(LinkPath {
        source_id: parent.id.clone(),
        target_id: child.id.clone(),
        other_union: child.is_from_other_union,
        commands,
    })
}

/// Couple connectors for every visible positioned node with a partner.
pub fn partner_links(root: &TreeNode, params: &LayoutParams) -> Vec<PartnerLink> {
    let mut links = Vec::new();
    root.visit_visible(&mut |node, _| {
        let (Some(partner), Some((x, y))) = (&node.partner, node.position()) else {
            return;
        };
        links.push(PartnerLink {
            owner_id: node.id.clone(),
            partner_id: partner.id.clone(),
            x1: x + params.node_radius,
            x2: x + params.partner_distance - params.node_radius,
            y,
        });
    });
    links
}
