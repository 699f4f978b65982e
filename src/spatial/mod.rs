//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based spatial index over the placements
//! of a laid out chart, for click hit testing and viewport queries.

mod rtree;

pub use rtree::SpatialIndex;
