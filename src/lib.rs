//! Family Tree - WASM Module
//!
//! This module provides the hierarchy construction, layout and mutation
//! core of a genealogical chart. It is compiled to WebAssembly and exposes
//! a JavaScript-friendly API via wasm-bindgen; the renderer consumes the
//! positioned slots and connector paths it produces.
//!
//! # Architecture
//!
//! - `graph`: Person records, kinship index (petgraph's StableGraph), tree
//!   construction with partners and blended-family children
//! - `layout`: Four-pass chart layout and connector routing
//! - `mutation`: Collapse/expand toggles on a copy of the tree
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `engine`: Stateful session tying the above together

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

mod error;

pub mod engine;
pub mod graph;
pub mod layout;
pub mod mutation;
pub mod spatial;

pub use error::{DataWarning, Error, Result};

use engine::{ChartEngine, DEFAULT_ROOT_LABEL};
use graph::{Person, PersonId};
use layout::LayoutParams;

/// Initialize the WASM module: console logging and readable panics.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already set when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Main entry point for the chart.
///
/// This struct wraps the internal ChartEngine and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct FamilyTreeWasm {
    engine: ChartEngine,
}

#[wasm_bindgen]
impl FamilyTreeWasm {
    /// Create an empty chart whose invisible root carries `root_label`.
    #[wasm_bindgen(constructor)]
    pub fn new(root_label: Option<String>) -> Self {
        let label = root_label.as_deref().unwrap_or(DEFAULT_ROOT_LABEL);
        Self {
            engine: ChartEngine::new(label),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Rebuild the chart from an array of person objects.
    #[wasm_bindgen(js_name = loadPeople)]
    pub fn load_people(&mut self, people: JsValue) -> std::result::Result<(), JsError> {
        let people: Vec<Person> = serde_wasm_bindgen::from_value(people)?;
        self.engine.load_people(people)?;
        Ok(())
    }

    /// Rebuild the chart from a JSON string holding an array of people.
    #[wasm_bindgen(js_name = loadPeopleJson)]
    pub fn load_people_json(&mut self, json: &str) -> std::result::Result<(), JsError> {
        self.engine.load_people_json(json)?;
        Ok(())
    }

    /// Set the layout parameters from a `{ nodeRadius, partnerDistance,
    /// siblingSpacingH, generationSpacingV }` object. Missing keys take
    /// their defaults.
    #[wasm_bindgen(js_name = setLayoutParams)]
    pub fn set_layout_params(&mut self, params: JsValue) -> std::result::Result<(), JsError> {
        let params: LayoutParams = serde_wasm_bindgen::from_value(params)?;
        self.engine.set_params(params)?;
        Ok(())
    }

    /// Collapse or expand a person's descendants.
    ///
    /// Returns `"collapsed"`, `"expanded"`, `"unchanged"` or `"notFound"`.
    pub fn toggle(&mut self, id: &str) -> std::result::Result<JsValue, JsError> {
        let outcome = self.engine.toggle(&PersonId::from(id))?;
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    // =========================================================================
    // Chart Output
    // =========================================================================

    /// The positioned hierarchy, or `null` before the first load.
    pub fn tree(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.engine.tree())?)
    }

    /// One entry per drawn circle: people and their displayed partners.
    pub fn placements(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.engine.placements())?)
    }

    /// Parent to child connectors.
    pub fn links(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.engine.links())?)
    }

    /// Couple connectors.
    #[wasm_bindgen(js_name = partnerLinks)]
    pub fn partner_links(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.engine.partner_links())?)
    }

    /// Slot positions as [x0, y0, x1, y1, ...], in placement order.
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.engine.positions())
    }

    /// Data problems found in the last loaded records.
    pub fn warnings(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.engine.warnings())?)
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Id of the person whose circle contains the point.
    #[wasm_bindgen(js_name = findPersonAt)]
    pub fn find_person_at(&self, x: f32, y: f32) -> Option<String> {
        self.engine.person_at(x, y).map(|p| p.id.to_string())
    }

    /// Ids of the people drawn inside a rectangular region.
    #[wasm_bindgen(js_name = findPeopleInRect)]
    pub fn find_people_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<String> {
        self.engine
            .people_in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|p| p.id.to_string())
            .collect()
    }

    /// Box around the given people, for zooming onto search results.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if none is drawn.
    #[wasm_bindgen(js_name = focusBounds)]
    pub fn focus_bounds(&self, ids: Vec<String>) -> Option<Vec<f32>> {
        let ids: Vec<PersonId> = ids.into_iter().map(PersonId::from).collect();
        self.engine
            .focus_bounds(&ids)
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    /// Get the bounding box of the whole chart.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if the chart is empty.
    pub fn bounds(&self) -> Option<Vec<f32>> {
        self.engine
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }
}

impl Default for FamilyTreeWasm {
    fn default() -> Self {
        Self::new(None)
    }
}
