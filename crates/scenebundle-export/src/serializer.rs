//! Scene serializer: fills resource buffers from a scene.
//!
//! The serializer enumerates exportable graphics in scene order. Graphic `k`
//! (counting from 1) is written to buffer `k`, and the metadata document in
//! buffer 0 refers to it by that buffer's placeholder name.
//!
//! Glyph sets also need the mesh of one glyph. It is returned as a separate
//! file named `{prefix}_glyph_{k}.{ext}`, which the metadata entry references
//! by that stable name.

use std::collections::BTreeMap;

use glam::Vec3;

use scenebundle_core::{
    Colouring, ExportError, ExportOptions, GlyphSettings, Graphic, GraphicKind, IoDataType,
    IoFormat, Result, Scene, TimeSteps,
};

use crate::buffer::ResourceBuffer;
use crate::bundle::{BundleFile, BundleNaming};
use crate::glyph_geometry::GlyphMesh;
use crate::metadata::{Metadata, ObjectEntry, TimeStepInfo};
use crate::payload::{
    flatten, frame_name, pack_colour, DescriptionPayload, GeometryMetadata, GlyphMetadata,
    GlyphPayload, MaterialEntry, MorphColors, MorphTarget, MorphValues, ThreeJsGeometry,
};

/// Writes a scene into resource buffers according to export options.
#[derive(Debug, Clone)]
pub struct SceneSerializer<'a> {
    options: &'a ExportOptions,
    steps: TimeSteps,
}

impl<'a> SceneSerializer<'a> {
    /// Creates a serializer, validating the time settings of `options`.
    pub fn new(options: &'a ExportOptions) -> Result<Self> {
        Ok(Self {
            options,
            steps: options.time_steps()?,
        })
    }

    /// Returns the sampled time steps.
    #[must_use]
    pub fn time_steps(&self) -> &TimeSteps {
        &self.steps
    }

    /// Returns the number of buffers an export of `scene` needs: one per
    /// exportable graphic plus the metadata buffer.
    #[must_use]
    pub fn resources_required(&self, scene: &Scene) -> usize {
        scene.num_exportable() + 1
    }

    /// Serializes `scene` into `buffers`.
    ///
    /// `buffers` must hold exactly [`resources_required`](Self::resources_required)
    /// buffers. Payloads are written first, then the metadata document. Every
    /// exported graphic is validated again, since it may have been edited
    /// after it was added to the scene.
    ///
    /// Returns the glyph geometry files, named by `naming`.
    pub fn write(
        &self,
        scene: &Scene,
        naming: &BundleNaming,
        buffers: &mut [ResourceBuffer],
    ) -> Result<Vec<BundleFile>> {
        let expected = self.resources_required(scene);
        if buffers.len() != expected {
            return Err(ExportError::ResourceCountMismatch {
                expected,
                actual: buffers.len(),
            });
        }

        let mut objects = Vec::with_capacity(expected - 1);
        let mut glyph_geometries = Vec::new();
        let payloads = scene.exportable_graphics().zip(buffers[1..].iter_mut());
        for (k, (graphic, buffer)) in (1..).zip(payloads) {
            graphic.validate()?;
            let frames = Frames::new(self, scene, graphic)?;
            log::debug!(
                "serializing {} '{}' into {}",
                graphic.metadata_type(),
                graphic.name(),
                buffer.placeholder_name()
            );
            let mut glyph_geometry_url = None;
            match self.options.format {
                IoFormat::ThreeJs => match graphic.kind() {
                    GraphicKind::Glyphs(settings) => {
                        serde_json::to_writer(&mut *buffer, &frames.glyph_payload(settings))?;
                        let material = scene.materials().require(graphic.material())?;
                        let geometry = GlyphMesh::for_shape(settings.shape)
                            .to_geometry(graphic.name(), material);
                        let name = naming.glyph_geometry_name(k);
                        glyph_geometries.push(BundleFile {
                            name: name.clone(),
                            bytes: serde_json::to_vec(&geometry)?,
                        });
                        glyph_geometry_url = Some(name);
                    }
                    _ => serde_json::to_writer(&mut *buffer, &frames.geometry(scene)?)?,
                },
                IoFormat::Description => {
                    serde_json::to_writer(&mut *buffer, &frames.description())?;
                }
            }
            objects.push(frames.entry(buffer.placeholder_name(), glyph_geometry_url));
        }

        let metadata = Metadata {
            format: self.options.format.as_str().to_string(),
            data_type: self.options.data_type.as_str().to_string(),
            time_steps: TimeStepInfo::from(&self.steps),
            objects,
        };
        serde_json::to_writer_pretty(&mut buffers[0], &metadata)?;
        Ok(glyph_geometries)
    }
}

/// Per-vertex data of one graphic sampled at every export step.
struct Frames<'g> {
    graphic: &'g Graphic,
    /// Positions per step; a single entry when vertices are not morphed.
    positions: Vec<Vec<Vec3>>,
    /// Colours per step; empty when no colours are exported.
    colours: Vec<Vec<Vec3>>,
    /// Raw data values per step, for per-vertex value exports.
    values: Vec<Vec<f32>>,
    /// Glyph orientation vectors, sampled with the positions.
    orientations: Vec<Vec<Vec3>>,
    morph_vertices: bool,
    morph_colours: bool,
    steps: usize,
}

impl<'g> Frames<'g> {
    fn new(serializer: &SceneSerializer<'_>, scene: &Scene, graphic: &'g Graphic) -> Result<Self> {
        let options = serializer.options;
        let steps = &serializer.steps;
        scene.materials().require(graphic.material())?;
        let animated = steps.len() > 1;
        let morph_vertices =
            options.time_dependent_vertices && animated && graphic.has_time_varying_vertices();

        let has_data = matches!(graphic.colouring(), Colouring::Data { .. })
            && options.data_type != IoDataType::Geometry;
        let morph_colours = options.time_dependent_colours
            && animated
            && has_data
            && graphic.has_time_varying_colours();

        let vertex_times = sample_times(steps, morph_vertices);
        let colour_times = sample_times(steps, morph_colours);

        let positions = vertex_times
            .iter()
            .map(|t| graphic.coordinates().evaluate(*t))
            .collect();
        let orientations = match graphic.kind() {
            GraphicKind::Glyphs(GlyphSettings {
                orientation: Some(orientation),
                ..
            }) => vertex_times.iter().map(|t| orientation.evaluate(*t)).collect(),
            _ => Vec::new(),
        };

        let mut colours = Vec::new();
        let mut values = Vec::new();
        if let (true, Colouring::Data { values: data, spectrum }) = (has_data, graphic.colouring())
        {
            let spectrum = scene.spectra().require(spectrum)?;
            for t in &colour_times {
                let sampled = data.evaluate(*t);
                match options.data_type {
                    IoDataType::Colour => colours.push(spectrum.evaluate_all(&sampled)),
                    IoDataType::PerVertexValue => values.push(sampled),
                    IoDataType::Geometry => {}
                }
            }
        }

        Ok(Self {
            graphic,
            positions,
            colours,
            values,
            orientations,
            morph_vertices,
            morph_colours,
            steps: steps.len(),
        })
    }

    fn entry(&self, url: String, glyph_geometry_url: Option<String>) -> ObjectEntry {
        let glyph_shape = match self.graphic.kind() {
            GraphicKind::Glyphs(settings) => Some(settings.shape.as_str().to_string()),
            _ => None,
        };
        let spectrum_name = if self.colours.is_empty() && self.values.is_empty() {
            None
        } else {
            self.graphic.spectrum().map(str::to_string)
        };
        ObjectEntry {
            kind: self.graphic.metadata_type().to_string(),
            url,
            group_name: self.graphic.name().to_string(),
            material_name: self.graphic.material().to_string(),
            morph_vertices: self.morph_vertices,
            morph_colours: self.morph_colours,
            number_of_vertices: self.graphic.num_vertices(),
            spectrum_name,
            glyph_shape,
            glyph_geometries_url: glyph_geometry_url,
        }
    }

    fn geometry(&self, scene: &Scene) -> Result<ThreeJsGeometry> {
        let material = scene.materials().require(self.graphic.material())?;
        let vertex_colours = !self.colours.is_empty();
        let uvs: Vec<Vec<f32>> = match (self.graphic.kind(), self.graphic.texture_coordinates()) {
            (GraphicKind::Surfaces { .. }, Some(coordinates)) => {
                vec![coordinates.iter().flat_map(|uv| uv.to_array()).collect()]
            }
            _ => Vec::new(),
        };
        let textured = !uvs.is_empty();

        let mut faces = Vec::new();
        let mut lines = Vec::new();
        let mut face_count = 0;
        match self.graphic.kind() {
            GraphicKind::Surfaces { triangles } => {
                face_count = triangles.len();
                // Bit 3 adds uv indices and bit 7 colour indices, in that order
                let face_type = u32::from(textured) * 8 + u32::from(vertex_colours) * 128;
                for [a, b, c] in triangles {
                    faces.extend_from_slice(&[face_type, *a, *b, *c]);
                    if textured {
                        faces.extend_from_slice(&[*a, *b, *c]);
                    }
                    if vertex_colours {
                        faces.extend_from_slice(&[*a, *b, *c]);
                    }
                }
            }
            GraphicKind::Lines { segments } | GraphicKind::Streamlines { segments } => {
                lines = segments.iter().flatten().copied().collect();
            }
            GraphicKind::Points | GraphicKind::Glyphs(_) => {}
        }

        let colors: Vec<u32> = self
            .colours
            .first()
            .map(|c| c.iter().copied().map(pack_colour).collect())
            .unwrap_or_default();

        let morph_targets: Vec<MorphTarget> = if self.morph_vertices {
            self.positions
                .iter()
                .enumerate()
                .map(|(i, p)| MorphTarget {
                    name: frame_name(i),
                    vertices: flatten(p),
                })
                .collect()
        } else {
            Vec::new()
        };

        let morph_colors = if self.morph_colours {
            self.colours
                .iter()
                .enumerate()
                .map(|(i, c)| MorphColors {
                    name: frame_name(i),
                    colors: c.iter().copied().map(pack_colour).collect(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let morph_values = if self.morph_colours {
            self.values
                .iter()
                .enumerate()
                .map(|(i, v)| MorphValues {
                    name: frame_name(i),
                    values: v.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let values = self.values.first().cloned();
        let spectrum = values
            .as_ref()
            .and_then(|_| self.graphic.spectrum().map(str::to_string));

        Ok(ThreeJsGeometry {
            metadata: GeometryMetadata {
                format_version: 3,
                generated_by: "scenebundle",
                vertices: self.graphic.num_vertices(),
                faces: face_count,
                colors: colors.len(),
                uvs: uvs.first().map_or(0, |layer| layer.len() / 2),
                morph_targets: morph_targets.len(),
            },
            materials: vec![MaterialEntry::new(
                self.graphic.name(),
                material,
                vertex_colours,
            )],
            vertices: flatten(&self.positions[0]),
            faces,
            lines,
            colors,
            uvs,
            morph_targets,
            morph_colors,
            values,
            morph_values,
            spectrum,
        })
    }

    fn glyph_payload(&self, settings: &GlyphSettings) -> GlyphPayload {
        let mut positions = BTreeMap::new();
        let mut axis1 = BTreeMap::new();
        let mut axis2 = BTreeMap::new();
        let mut axis3 = BTreeMap::new();
        let mut scale = BTreeMap::new();
        for (i, points) in self.positions.iter().enumerate() {
            positions.insert(i, points.iter().map(|p| p.to_array()).collect());
            let frame = GlyphFrame::new(self.orientations.get(i).map(Vec::as_slice), points.len());
            axis1.insert(i, frame.axis1);
            axis2.insert(i, frame.axis2);
            axis3.insert(i, frame.axis3);
            scale.insert(i, frame.scale);
        }

        let colors = self
            .colours
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.iter().copied().map(pack_colour).collect()))
            .collect();

        GlyphPayload {
            metadata: GlyphMetadata {
                number_of_time_steps: if self.morph_vertices || self.morph_colours {
                    self.steps
                } else {
                    1
                },
                morph_vertices: self.morph_vertices,
                morph_colours: self.morph_colours,
                number_of_vertices: self.graphic.num_vertices(),
                base_size: settings.base_size.to_array(),
                offset: settings.offset.to_array(),
                scale_factors: settings.scale_factors.to_array(),
                glyph_shape: settings.shape.as_str(),
                repeat_mode: "NONE",
            },
            positions,
            axis1,
            axis2,
            axis3,
            scale,
            colors,
            label: self.graphic.labels().map(<[String]>::to_vec),
        }
    }

    fn description(&self) -> DescriptionPayload {
        let number_of_elements = match self.graphic.kind() {
            GraphicKind::Surfaces { triangles } => triangles.len(),
            GraphicKind::Lines { segments } | GraphicKind::Streamlines { segments } => {
                segments.len()
            }
            GraphicKind::Points | GraphicKind::Glyphs(_) => self.graphic.num_vertices(),
        };
        let glyph_shape = match self.graphic.kind() {
            GraphicKind::Glyphs(settings) => Some(settings.shape.as_str()),
            _ => None,
        };
        DescriptionPayload {
            name: self.graphic.name().to_string(),
            kind: self.graphic.metadata_type(),
            material_name: self.graphic.material().to_string(),
            spectrum_name: self.graphic.spectrum().map(str::to_string),
            number_of_vertices: self.graphic.num_vertices(),
            number_of_elements,
            keyframe_range: self.graphic.time_range().map(|(a, b)| [a, b]),
            morph_vertices: self.morph_vertices,
            morph_colours: self.morph_colours,
            glyph_shape,
        }
    }
}

/// Times at which data is sampled: every step when morphing, else the first.
fn sample_times(steps: &TimeSteps, every_step: bool) -> Vec<f64> {
    if every_step {
        steps.iter().collect()
    } else {
        vec![steps.initial_time()]
    }
}

/// Per-glyph axes and scales of one step.
///
/// Axis 1 follows the orientation vector; axes 2 and 3 complete a
/// right-handed orthonormal frame. Points without an orientation field get
/// the identity frame with zero scale.
#[derive(Debug, Default, PartialEq)]
struct GlyphFrame {
    axis1: Vec<[f32; 3]>,
    axis2: Vec<[f32; 3]>,
    axis3: Vec<[f32; 3]>,
    scale: Vec<[f32; 3]>,
}

impl GlyphFrame {
    fn new(orientation: Option<&[Vec3]>, count: usize) -> Self {
        let Some(vectors) = orientation else {
            return Self {
                axis1: vec![Vec3::X.to_array(); count],
                axis2: vec![Vec3::Y.to_array(); count],
                axis3: vec![Vec3::Z.to_array(); count],
                scale: vec![[0.0; 3]; count],
            };
        };
        let mut frame = Self::default();
        for v in vectors {
            let axis = v.try_normalize().unwrap_or(Vec3::X);
            let second = axis.any_orthonormal_vector();
            frame.axis1.push(axis.to_array());
            frame.axis2.push(second.to_array());
            frame.axis3.push(axis.cross(second).to_array());
            frame.scale.push([v.length(); 3]);
        }
        frame
    }
}
