//! Construction options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tuning values for the sensor assemblies and the surrounding media.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionParameters {
    /// Shift of the gel overflow ring along the pad axis (mm). `None` builds no ring.
    pub ring_offset: Option<f64>,

    /// Photocathode coverage of the PMT waist (mm).
    pub tube_length: f64,

    /// Whether placed gel pads get a reflective border.
    pub solid_reflector: bool,

    /// Whether to carve the immersion medium around the base structure.
    pub submerge: bool,
}

impl Default for DimensionParameters {
    fn default() -> Self {
        Self {
            ring_offset: None,
            tube_length: 0.0,
            solid_reflector: false,
            submerge: false,
        }
    }
}

/// One placement command: radius in mm, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
}

/// Every construction-time option, as a command layer would supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionOptions {
    /// Path of the external structural description. Empty means a synthetic world.
    pub base_structure_file: String,

    /// Carve the immersion medium after the base structure is loaded.
    pub submerge: bool,

    /// Wrap each placed gel pad in a reflective border.
    pub solid_reflector: bool,

    /// Origin of the optical-unit frame (mm).
    pub frame_origin: [f64; 3],

    /// First reference direction of the optical-unit frame.
    pub frame_ref_x: [f64; 3],

    /// Second reference direction of the optical-unit frame.
    pub frame_ref_y: [f64; 3],

    /// Units to place, in request order.
    pub placements: Vec<PlacementSpec>,

    /// Gel overflow ring offset (mm).
    pub gel_ring_offset: Option<f64>,

    /// Photocathode coverage of the PMT waist (mm).
    pub photocathode_tube_length: f64,
}

impl Default for ConstructionOptions {
    fn default() -> Self {
        Self {
            base_structure_file: String::new(),
            submerge: false,
            solid_reflector: false,
            frame_origin: [0.0; 3],
            frame_ref_x: [1.0, 0.0, 0.0],
            frame_ref_y: [0.0, 1.0, 0.0],
            placements: Vec::new(),
            gel_ring_offset: None,
            photocathode_tube_length: 0.0,
        }
    }
}

impl ConstructionOptions {
    /// Reads options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses options from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
