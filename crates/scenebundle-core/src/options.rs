//! Configuration options for an export.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::TimeSteps;

/// Settings controlling a single scene export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Payload document format.
    pub format: IoFormat,

    /// Which per-vertex data accompanies the geometry.
    pub data_type: IoDataType,

    /// Number of time steps to sample.
    pub number_of_time_steps: usize,

    /// First sampled time.
    pub initial_time: f64,

    /// Last sampled time.
    pub finish_time: f64,

    /// Whether vertex positions are written for every time step.
    pub time_dependent_vertices: bool,

    /// Whether colours are written for every time step.
    pub time_dependent_colours: bool,

    /// File name stem shared by every file in the bundle.
    pub prefix: String,

    /// File name extension, without the dot.
    pub extension: String,

    /// Whether the camera is reset to frame all content before capture.
    pub view_all: bool,

    /// Camera view angle used when framing content, in degrees.
    pub view_angle: f32,

    /// Whether unresolved metadata references fail the export.
    pub strict_references: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: IoFormat::ThreeJs,
            data_type: IoDataType::Colour,
            number_of_time_steps: 1,
            initial_time: 0.0,
            finish_time: 0.0,
            time_dependent_vertices: false,
            time_dependent_colours: false,
            prefix: "scene".to_string(),
            extension: "json".to_string(),
            view_all: true,
            view_angle: 40.0,
            strict_references: false,
        }
    }
}

impl ExportOptions {
    /// Creates default options with the given file prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Sets the sampled time range.
    #[must_use]
    pub fn with_time_range(mut self, steps: usize, initial_time: f64, finish_time: f64) -> Self {
        self.number_of_time_steps = steps;
        self.initial_time = initial_time;
        self.finish_time = finish_time;
        self
    }

    /// Sets the per-frame vertex and colour toggles.
    #[must_use]
    pub fn with_time_dependence(mut self, vertices: bool, colours: bool) -> Self {
        self.time_dependent_vertices = vertices;
        self.time_dependent_colours = colours;
        self
    }

    /// Sets whether unresolved metadata references fail the export.
    #[must_use]
    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// Validates the time settings and returns the sample times.
    pub fn time_steps(&self) -> Result<TimeSteps> {
        TimeSteps::new(self.number_of_time_steps, self.initial_time, self.finish_time)
    }

    /// Parses options from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded export options from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }
}

/// Payload document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IoFormat {
    /// three.js JSON geometry with morph targets.
    #[default]
    ThreeJs,
    /// A description of each graphic's settings instead of its geometry.
    Description,
}

impl IoFormat {
    /// Returns the identifier used in exported metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThreeJs => "threejs",
            Self::Description => "description",
        }
    }
}

/// Per-vertex data written alongside geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IoDataType {
    /// Geometry only.
    Geometry,
    /// Colours resolved through materials and spectra.
    #[default]
    Colour,
    /// Raw scalar values, with the spectrum name, for colouring on the client.
    PerVertexValue,
}

impl IoDataType {
    /// Returns the identifier used in exported metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::Colour => "colour",
            Self::PerVertexValue => "per_vertex_value",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.format, IoFormat::ThreeJs);
        assert_eq!(options.data_type, IoDataType::Colour);
        assert_eq!(options.extension, "json");
        let steps = options.time_steps().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps.initial_time(), 0.0);
        assert!(!options.strict_references);
        assert!(options.with_strict_references(true).strict_references);
    }

    #[test]
    fn test_partial_json() {
        let options = ExportOptions::from_json_str(
            r#"{"prefix": "heart", "number_of_time_steps": 51, "finish_time": 1.0,
                "time_dependent_vertices": true, "data_type": "per_vertex_value"}"#,
        )
        .unwrap();
        assert_eq!(options.prefix, "heart");
        assert_eq!(options.data_type, IoDataType::PerVertexValue);
        assert!(options.time_dependent_vertices);
        assert!(!options.time_dependent_colours);
        assert_eq!(options.time_steps().unwrap().len(), 51);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ExportOptions::from_json_str("{\"prefix\": 3}"),
            Err(ExportError::JsonError(_))
        ));
    }

    #[test]
    fn test_invalid_time_range() {
        let options = ExportOptions::default().with_time_range(3, 1.0, 0.0);
        assert!(options.time_steps().is_err());
    }
}
