//! ChartEngine - stateful chart session.
//!
//! Owns the person records, the current hierarchy and everything derived
//! from its layout, and keeps them consistent across loads, toggles and
//! parameter changes:
//! - Person records and the warnings found while building from them
//! - The positioned [`TreeNode`] hierarchy
//! - Renderer output: placements, connector paths, interleaved positions
//! - Spatial index over the placements for hit testing

use log::debug;

use crate::error::{DataWarning, Error, Result};
use crate::graph::{self, Person, PersonId, TreeNode, parse_people};
use crate::layout::{
    self, LayoutParams, LinkPath, PartnerLink, Placement, parent_child_links, partner_links,
    placements,
};
use crate::mutation::{ToggleOutcome, toggle_with_outcome};
use crate::spatial::SpatialIndex;

/// Label of the synthetic root when none is given.
pub const DEFAULT_ROOT_LABEL: &str = "Family";

/// The chart engine.
pub struct ChartEngine {
    root_label: String,
    params: LayoutParams,

    people: Vec<Person>,
    warnings: Vec<DataWarning>,

    /// Positioned hierarchy, `None` until the first successful load
    tree: Option<TreeNode>,

    placements: Vec<Placement>,
    /// Slot positions as [x0, y0, x1, y1, ...], in placement order
    positions: Vec<f32>,
    links: Vec<LinkPath>,
    partner_links: Vec<PartnerLink>,

    spatial: SpatialIndex,
}

impl ChartEngine {
    /// Create an empty engine with default layout parameters.
    pub fn new(root_label: &str) -> Self {
        Self {
            root_label: root_label.to_owned(),
            params: LayoutParams::default(),
            people: Vec::new(),
            warnings: Vec::new(),
            tree: None,
            placements: Vec::new(),
            positions: Vec::new(),
            links: Vec::new(),
            partner_links: Vec::new(),
            spatial: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Rebuild and lay out the chart from scratch.
    ///
    /// On error the previous chart stays in place.
    pub fn load_people(&mut self, people: Vec<Person>) -> Result<()> {
        let outcome = graph::build(&people, &self.root_label)?;
        let mut tree = outcome.tree;
        layout::layout(&mut tree, &self.params)?;

        self.people = people;
        self.warnings = outcome.warnings;
        self.commit(tree);
        Ok(())
    }

    /// [`ChartEngine::load_people`] from a JSON array of person records.
    pub fn load_people_json(&mut self, json: &str) -> Result<()> {
        let people = parse_people(json)?;
        self.load_people(people)
    }

    /// Replace the layout parameters, relaying out the current chart.
    pub fn set_params(&mut self, params: LayoutParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        if let Some(mut tree) = self.tree.take() {
            layout::layout(&mut tree, &self.params)?;
            self.commit(tree);
        }
        Ok(())
    }

    /// Collapse or expand one node and relayout.
    pub fn toggle(&mut self, id: &PersonId) -> Result<ToggleOutcome> {
        let tree = self.tree.as_ref().ok_or(Error::NotBuilt)?;
        let (mut next, outcome) = toggle_with_outcome(tree, id);

        match outcome {
            ToggleOutcome::Collapsed | ToggleOutcome::Expanded => {
                layout::layout(&mut next, &self.params)?;
                self.commit(next);
            }
            ToggleOutcome::Unchanged | ToggleOutcome::NotFound => {}
        }
        debug!("toggle {id}: {outcome:?}");
        Ok(outcome)
    }

    fn commit(&mut self, tree: TreeNode) {
        self.placements = placements(&tree, &self.params);
        self.positions = self.placements.iter().flat_map(|p| [p.x, p.y]).collect();
        self.links = parent_child_links(&tree, &self.params);
        self.partner_links = partner_links(&tree, &self.params);
        self.spatial.rebuild(&self.placements);
        self.tree = Some(tree);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    #[inline]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    #[inline]
    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    #[inline]
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn links(&self) -> &[LinkPath] {
        &self.links
    }

    #[inline]
    pub fn partner_links(&self) -> &[PartnerLink] {
        &self.partner_links
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// The slot drawn under a point, if the point falls inside its circle.
    pub fn person_at(&self, x: f32, y: f32) -> Option<&Placement> {
        self.spatial
            .nearest_within(x, y, self.params.node_radius)
            .and_then(|slot| self.placements.get(slot as usize))
    }

    /// Slots whose center lies inside the rectangle.
    pub fn people_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<&Placement> {
        self.spatial
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .filter_map(|slot| self.placements.get(slot as usize))
            .collect()
    }

    /// Box around the circles of the given people, partners included.
    ///
    /// People that are hidden or unknown are ignored; `None` when none of
    /// them is on the chart.
    pub fn focus_bounds(&self, ids: &[PersonId]) -> Option<(f32, f32, f32, f32)> {
        let slots = self.placements.iter().filter(|p| ids.contains(&p.id));
        layout::bounds(slots, self.params.node_radius)
    }

    /// Box around every circle on the chart.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        layout::bounds(&self.placements, self.params.node_radius)
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_LABEL)
    }
}
