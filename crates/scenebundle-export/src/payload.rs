//! Payload documents written to buffers `1..=N`.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::Serialize;

use scenebundle_core::Material;

/// Packs a colour in `[0, 1]` into a `0xRRGGBB` integer.
#[must_use]
pub fn pack_colour(colour: Vec3) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(colour.x) << 16) | (channel(colour.y) << 8) | channel(colour.z)
}

/// Flattens positions into `[x0, y0, z0, x1, ...]`.
#[must_use]
pub fn flatten(points: &[Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

/// Name of the morph frame for step `index`.
#[must_use]
pub fn frame_name(index: usize) -> String {
    format!("animation_{index:03}")
}

/// three.js JSON geometry (format version 3).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeJsGeometry {
    pub metadata: GeometryMetadata,
    pub materials: Vec<MaterialEntry>,
    pub vertices: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<u32>,
    /// Texture coordinate layers, each `[u0, v0, u1, v1, ...]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<Vec<f32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub morph_targets: Vec<MorphTarget>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub morph_colors: Vec<MorphColors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub morph_values: Vec<MorphValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<String>,
}

/// Header of a three.js geometry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryMetadata {
    pub format_version: u32,
    pub generated_by: &'static str,
    pub vertices: usize,
    pub faces: usize,
    pub colors: usize,
    pub uvs: usize,
    pub morph_targets: usize,
}

/// A three.js legacy material entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialEntry {
    #[serde(rename = "DbgName")]
    pub dbg_name: String,
    pub color_ambient: [f32; 3],
    pub color_diffuse: [f32; 3],
    pub color_emissive: [f32; 3],
    pub color_specular: [f32; 3],
    pub specular_coef: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub vertex_colors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_diffuse: Option<String>,
}

impl MaterialEntry {
    /// Builds the entry for `material`.
    pub fn new(name: &str, material: &Material, vertex_colors: bool) -> Self {
        Self {
            dbg_name: name.to_string(),
            color_ambient: material.ambient.to_array(),
            color_diffuse: material.diffuse.to_array(),
            color_emissive: material.emission.to_array(),
            color_specular: material.specular.to_array(),
            // three.js specular exponents run to 128
            specular_coef: material.shininess * 128.0,
            opacity: material.alpha,
            transparent: material.is_transparent(),
            vertex_colors,
            map_diffuse: material.texture.clone(),
        }
    }
}

/// Vertex positions of one time step.
#[derive(Debug, Clone, Serialize)]
pub struct MorphTarget {
    pub name: String,
    pub vertices: Vec<f32>,
}

/// Vertex colours of one time step.
#[derive(Debug, Clone, Serialize)]
pub struct MorphColors {
    pub name: String,
    pub colors: Vec<u32>,
}

/// Raw data values of one time step.
#[derive(Debug, Clone, Serialize)]
pub struct MorphValues {
    pub name: String,
    pub values: Vec<f32>,
}

/// A glyph set payload. Per-step maps are keyed by step index.
#[derive(Debug, Clone, Serialize)]
pub struct GlyphPayload {
    pub metadata: GlyphMetadata,
    pub positions: BTreeMap<usize, Vec<[f32; 3]>>,
    pub axis1: BTreeMap<usize, Vec<[f32; 3]>>,
    pub axis2: BTreeMap<usize, Vec<[f32; 3]>>,
    pub axis3: BTreeMap<usize, Vec<[f32; 3]>>,
    pub scale: BTreeMap<usize, Vec<[f32; 3]>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<usize, Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Vec<String>>,
}

/// Header of a glyph set payload.
#[derive(Debug, Clone, Serialize)]
pub struct GlyphMetadata {
    pub number_of_time_steps: usize,
    #[serde(rename = "MorphVertices")]
    pub morph_vertices: bool,
    #[serde(rename = "MorphColours")]
    pub morph_colours: bool,
    pub number_of_vertices: usize,
    pub base_size: [f32; 3],
    pub offset: [f32; 3],
    pub scale_factors: [f32; 3],
    pub glyph_shape: &'static str,
    pub repeat_mode: &'static str,
}

/// A payload describing a graphic's settings rather than its geometry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescriptionPayload {
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: &'static str,
    pub material_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum_name: Option<String>,
    pub number_of_vertices: usize,
    pub number_of_elements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyframe_range: Option<[f64; 2]>,
    pub morph_vertices: bool,
    pub morph_colours: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_shape: Option<&'static str>,
}
