//! R-tree over chart slots using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Click hit testing (nearest slot within a radius)
//! - Viewport culling (slots inside a rectangle)

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::Placement;

/// A slot center with its index in the placement list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPoint {
    pub slot: u32,
    pub x: f32,
    pub y: f32,
}

impl RTreeObject for SlotPoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for SlotPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        (self.x - point[0]).abs() < f32::EPSILON && (self.y - point[1]).abs() < f32::EPSILON
    }
}

/// Spatial index over the slots of a positioned chart.
///
/// Query results are indices into the placement slice the index was last
/// rebuilt from.
pub struct SpatialIndex {
    tree: RTree<SlotPoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load the index from `placements`, replacing its content.
    pub fn rebuild(&mut self, placements: &[Placement]) {
        let points: Vec<_> = placements
            .iter()
            .zip(0u32..)
            .map(|(p, slot)| SlotPoint { slot, x: p.x, y: p.y })
            .collect();
        self.tree = RTree::bulk_load(points);
    }

    /// Nearest slot whose center lies within `max_distance` of the point.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<u32> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.slot)
    }

    /// All slots with their center inside the rectangle, in slot order.
    pub fn in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<u32> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut slots: Vec<u32> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|point| point.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
