//! The metadata document written to buffer 0.
//!
//! Field names follow the item vocabulary of the WebGL scene loader
//! (`Type`, `URL`, `MorphVertices`, ...), wrapped in a top-level object that
//! also declares the sampled time steps.

use serde::{Deserialize, Serialize};

use scenebundle_core::TimeSteps;

/// Top-level metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    /// Payload format identifier.
    pub format: String,
    /// Per-vertex data identifier.
    pub data_type: String,
    /// Sampled time steps.
    pub time_steps: TimeStepInfo,
    /// One entry per exported payload, in payload order.
    pub objects: Vec<ObjectEntry>,
}

/// Declared time sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeStepInfo {
    /// Number of sampled steps.
    pub number_of_time_steps: usize,
    /// First sampled time.
    pub initial_time: f64,
    /// Last sampled time.
    pub finish_time: f64,
}

impl From<&TimeSteps> for TimeStepInfo {
    fn from(steps: &TimeSteps) -> Self {
        Self {
            number_of_time_steps: steps.len(),
            initial_time: steps.initial_time(),
            finish_time: steps.finish_time(),
        }
    }
}

/// One exported graphic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectEntry {
    /// Loader object type: `Surfaces`, `Lines`, `Points` or `Glyph`.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Reference to the payload; a placeholder until rewritten.
    #[serde(rename = "URL")]
    pub url: String,
    /// Graphic name.
    pub group_name: String,
    /// Material name.
    pub material_name: String,
    /// Whether the payload holds per-step vertices.
    pub morph_vertices: bool,
    /// Whether the payload holds per-step colours.
    pub morph_colours: bool,
    /// Number of vertices in the payload.
    pub number_of_vertices: usize,
    /// Spectrum name for data-coloured graphics.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spectrum_name: Option<String>,
    /// Glyph shape for glyph sets.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glyph_shape: Option<String>,
    /// Stable name of the glyph mesh file for glyph sets.
    #[serde(rename = "GlyphGeometriesURL", skip_serializing_if = "Option::is_none", default)]
    pub glyph_geometries_url: Option<String>,
}
