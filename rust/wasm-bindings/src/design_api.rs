// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebAssembly bindings for design editing
//!
//! Node ids cross the boundary as plan coordinates in centimeters; walls and
//! dimensions are addressed by their position in `getWalls()` /
//! `getDimensions()`.

use std::collections::BTreeMap;

use planlite_layout::{
    Axis, Design, DimensionKey, EditorState, LayoutConfig, NodeId, NodeOrientation,
    OpeningRequest, Orientation, Perimeter, Regeneration, SpanMode, Tier, WallKey,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::utils::report_stale_overrides;

/// Editor feedback for an opening composition
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpeningStatus {
    valid: bool,
    total: f64,
    free_span: f64,
    remaining: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Dimension annotation with its current value (null once a node is gone)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionView {
    node_a: NodeId,
    node_b: NodeId,
    mode: SpanMode,
    value: Option<f64>,
}

fn node_id(x: f64, y: f64) -> NodeId {
    NodeId::from_position(x, y)
}

fn parse_orientation(value: &str) -> Result<Orientation, JsError> {
    match value.to_ascii_lowercase().as_str() {
        "vertical" => Ok(Orientation::Vertical),
        "horizontal" => Ok(Orientation::Horizontal),
        other => Err(JsError::new(&format!("Invalid orientation: {}", other))),
    }
}

fn parse_node_orientation(value: &str) -> Result<NodeOrientation, JsError> {
    match parse_orientation(value)? {
        Orientation::Vertical => Ok(NodeOrientation::Vertical),
        Orientation::Horizontal => Ok(NodeOrientation::Horizontal),
    }
}

fn parse_mode(value: &str) -> Result<SpanMode, JsError> {
    match value {
        "axisToAxis" | "AxisToAxis" => Ok(SpanMode::AxisToAxis),
        "free" | "Free" => Ok(SpanMode::Free),
        other => Err(JsError::new(&format!("Invalid span mode: {}", other))),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid {}: {}", what, e)))
}

/// Building design editing API
#[wasm_bindgen]
pub struct DesignAPI {
    design: Design,
}

impl DesignAPI {
    fn regenerated(&self, regeneration: Regeneration) -> Result<JsValue, JsError> {
        report_stale_overrides(&regeneration);
        to_js(&regeneration)
    }

    fn wall_key(&self, index: usize) -> Result<WallKey, JsError> {
        self.design
            .walls()
            .nth(index)
            .map(|(key, _)| key)
            .ok_or_else(|| JsError::new(&format!("No wall at index {}", index)))
    }

    // Slot maps reuse freed slots, so a new entry is not always listed last.
    fn wall_index(&self, key: WallKey) -> Result<usize, JsError> {
        self.design
            .walls()
            .position(|(k, _)| k == key)
            .ok_or_else(|| JsError::new("wall not found"))
    }

    fn dimension_index(&self, key: DimensionKey) -> Result<usize, JsError> {
        self.design
            .dimensions()
            .position(|(k, _)| k == key)
            .ok_or_else(|| JsError::new("dimension not found"))
    }

    fn dimension_key(&self, index: usize) -> Result<DimensionKey, JsError> {
        self.design
            .dimensions()
            .nth(index)
            .map(|(key, _)| key)
            .ok_or_else(|| JsError::new(&format!("No dimension at index {}", index)))
    }
}

#[wasm_bindgen]
impl DesignAPI {
    /// Create a design with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, length: f64, tier: &str) -> Result<DesignAPI, JsError> {
        let design = Design::new(
            Perimeter::new(width, length)?,
            Tier::from_id(tier)?,
            LayoutConfig::default(),
        )?;
        Ok(Self { design })
    }

    /// Restore a design saved with `toJson`
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<DesignAPI, JsError> {
        Ok(Self {
            design: Design::from_json(json)?,
        })
    }

    /// Save the design as a JSON string
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        Ok(self.design.to_json()?)
    }

    /// Save the design as a `{ key: json }` object for local storage
    #[wasm_bindgen(js_name = toKeyValues)]
    pub fn to_key_values(&self) -> Result<JsValue, JsError> {
        to_js(&self.design.to_key_values()?)
    }

    /// Restore a design saved with `toKeyValues`
    #[wasm_bindgen(js_name = fromKeyValues)]
    pub fn from_key_values(values: JsValue) -> Result<DesignAPI, JsError> {
        let map: BTreeMap<String, String> = from_js(values, "key-value snapshot")?;
        Ok(Self {
            design: Design::from_key_values(&map)?,
        })
    }

    /// Set kernel configuration from JSON
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_json: &str) -> Result<JsValue, JsError> {
        let config = LayoutConfig::from_json(config_json)
            .map_err(|e| JsError::new(&format!("Invalid config JSON: {}", e)))?;
        let regeneration = self.design.set_config(config)?;
        self.regenerated(regeneration)
    }

    /// Get current configuration as JSON
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> String {
        self.design
            .config()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Current lattice revision
    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> f64 {
        self.design.revision() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn tier(&self) -> String {
        self.design.tier().id().to_string()
    }

    // --- Axis store and lattice ---

    #[wasm_bindgen(js_name = setPerimeter)]
    pub fn set_perimeter(&mut self, width: f64, length: f64) -> Result<JsValue, JsError> {
        let regeneration = self.design.set_perimeter(Perimeter::new(width, length)?)?;
        self.regenerated(regeneration)
    }

    #[wasm_bindgen(js_name = setTier)]
    pub fn set_tier(&mut self, tier: &str) -> Result<JsValue, JsError> {
        let regeneration = self.design.set_tier(Tier::from_id(tier)?)?;
        self.regenerated(regeneration)
    }

    /// Add a secondary axis ("vertical" or "horizontal")
    #[wasm_bindgen(js_name = addAxis)]
    pub fn add_axis(&mut self, orientation: &str, offset: f64) -> Result<JsValue, JsError> {
        let axis = Axis {
            orientation: parse_orientation(orientation)?,
            offset,
        };
        let regeneration = self.design.add_axis(axis)?;
        self.regenerated(regeneration)
    }

    /// Remove the most recently added axis
    #[wasm_bindgen(js_name = undoAxis)]
    pub fn undo_axis(&mut self) -> Result<JsValue, JsError> {
        let regeneration = self.design.undo_axis()?;
        self.regenerated(regeneration)
    }

    #[wasm_bindgen(js_name = clearAxes)]
    pub fn clear_axes(&mut self) -> Result<JsValue, JsError> {
        let regeneration = self.design.clear_axes()?;
        self.regenerated(regeneration)
    }

    /// Turn the pier at a node ("vertical" or "horizontal"); finest tier only
    #[wasm_bindgen(js_name = setOrientation)]
    pub fn set_orientation(&mut self, x: f64, y: f64, orientation: &str) -> Result<JsValue, JsError> {
        let regeneration = self
            .design
            .set_orientation(node_id(x, y), parse_node_orientation(orientation)?)?;
        self.regenerated(regeneration)
    }

    #[wasm_bindgen(js_name = getAxes)]
    pub fn get_axes(&self) -> Result<JsValue, JsError> {
        to_js(&self.design.axes())
    }

    #[wasm_bindgen(js_name = getNodes)]
    pub fn get_nodes(&self) -> Result<JsValue, JsError> {
        to_js(&self.design.nodes())
    }

    // --- Dimensions ---

    /// Measure both spans between two nodes
    #[wasm_bindgen]
    pub fn measure(&self, ax: f64, ay: f64, bx: f64, by: f64) -> Result<JsValue, JsError> {
        to_js(&self.design.measure(node_id(ax, ay), node_id(bx, by))?)
    }

    /// Add a dimension annotation ("axisToAxis" or "free"); returns its index
    #[wasm_bindgen(js_name = addDimension)]
    pub fn add_dimension(
        &mut self,
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
        mode: &str,
    ) -> Result<usize, JsError> {
        let key = self
            .design
            .add_dimension(node_id(ax, ay), node_id(bx, by), parse_mode(mode)?)?;
        self.dimension_index(key)
    }

    #[wasm_bindgen(js_name = removeDimension)]
    pub fn remove_dimension(&mut self, index: usize) -> Result<(), JsError> {
        let key = self.dimension_key(index)?;
        self.design.remove_dimension(key)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getDimensions)]
    pub fn get_dimensions(&self) -> Result<JsValue, JsError> {
        let views: Vec<DimensionView> = self
            .design
            .dimensions()
            .map(|(key, d)| DimensionView {
                node_a: d.node_a,
                node_b: d.node_b,
                mode: d.mode,
                value: self.design.dimension_value(key).ok(),
            })
            .collect();
        to_js(&views)
    }

    // --- Walls ---

    /// Compute spans and endpoints for a wall between two nodes
    #[wasm_bindgen(js_name = planWall)]
    pub fn plan_wall(
        &self,
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
        lateral_displacement: f64,
    ) -> Result<JsValue, JsError> {
        let plan = self
            .design
            .plan_wall(node_id(ax, ay), node_id(bx, by), lateral_displacement)?;
        to_js(&plan)
    }

    /// Check an opening request for the wall between two nodes without committing
    #[wasm_bindgen(js_name = validateOpening)]
    pub fn validate_opening(
        &self,
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
        lateral_displacement: f64,
        request: JsValue,
    ) -> Result<JsValue, JsError> {
        let plan = self
            .design
            .plan_wall(node_id(ax, ay), node_id(bx, by), lateral_displacement)?;
        let request: OpeningRequest = from_js(request, "opening request")?;
        let editor = self.design.opening_editor(&plan, request);

        let error = editor.validate().err().map(|e| e.to_string());
        to_js(&OpeningStatus {
            valid: editor.state() == EditorState::Valid,
            total: editor.total(),
            free_span: editor.free_span(),
            remaining: editor.remaining(),
            error,
        })
    }

    /// Plan and commit the wall between two nodes; returns the wall index
    #[wasm_bindgen(js_name = commitWall)]
    pub fn commit_wall(
        &mut self,
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
        lateral_displacement: f64,
        request: JsValue,
    ) -> Result<usize, JsError> {
        let request: OpeningRequest = from_js(request, "opening request")?;
        let key = self.design.add_wall(
            node_id(ax, ay),
            node_id(bx, by),
            lateral_displacement,
            request,
        )?;
        self.wall_index(key)
    }

    #[wasm_bindgen(js_name = deleteWall)]
    pub fn delete_wall(&mut self, index: usize) -> Result<(), JsError> {
        let key = self.wall_key(index)?;
        self.design.delete_wall(key)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setLateralDisplacement)]
    pub fn set_lateral_displacement(&mut self, index: usize, displacement: f64) -> Result<(), JsError> {
        let key = self.wall_key(index)?;
        self.design.set_lateral_displacement(key, displacement)?;
        Ok(())
    }

    /// Per-wall quotation data
    #[wasm_bindgen(js_name = getWalls)]
    pub fn get_walls(&self) -> Result<JsValue, JsError> {
        to_js(&self.design.wall_reports())
    }

    #[wasm_bindgen(js_name = getSummary)]
    pub fn get_summary(&self) -> Result<JsValue, JsError> {
        to_js(&self.design.summary())
    }
}
