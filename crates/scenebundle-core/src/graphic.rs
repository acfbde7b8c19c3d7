//! Graphics: the renderable primitives of a scene.
//!
//! A [`Graphic`] pairs a primitive layout ([`GraphicKind`]) with keyframed
//! vertex coordinates and a [`Colouring`]. Coordinates and data are sampled
//! at export time, so a graphic built from 51 node files exports 51 frames.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::material::DEFAULT_MATERIAL;
use crate::time::TimeSeries;

/// Shape drawn at every glyph point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GlyphShape {
    /// A solid arrow along axis 1.
    #[default]
    Arrow,
    /// A cone along axis 1.
    Cone,
    /// A unit cube.
    Cube,
    /// A cylinder along axis 1.
    Cylinder,
    /// A sphere.
    Sphere,
    /// A single point.
    Point,
    /// A line along axis 1.
    Line,
    /// Three coordinate axes.
    Axes,
}

impl GlyphShape {
    /// Returns the identifier used in exported documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "arrow_solid",
            Self::Cone => "cone",
            Self::Cube => "cube_solid",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::Point => "point",
            Self::Line => "line",
            Self::Axes => "axes",
        }
    }
}

/// Glyph settings: size is `base_size + scale_factors * |orientation|`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSettings {
    /// Glyph shape.
    pub shape: GlyphShape,
    /// Constant glyph size along each axis.
    pub base_size: Vec3,
    /// Per-axis multipliers applied to the orientation magnitude.
    pub scale_factors: Vec3,
    /// Glyph origin offset, in units of the glyph axes.
    pub offset: Vec3,
    /// Orientation/scale vector per point (e.g. fibre axes). Axis 1 defaults to +X.
    pub orientation: Option<TimeSeries<Vec3>>,
}

impl GlyphSettings {
    /// Creates settings for `shape` with unit size and no orientation field.
    pub fn new(shape: GlyphShape) -> Self {
        Self {
            shape,
            base_size: Vec3::ONE,
            scale_factors: Vec3::ZERO,
            offset: Vec3::ZERO,
            orientation: None,
        }
    }
}

/// The primitive layout of a graphic.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicKind {
    /// Triangulated surfaces.
    Surfaces {
        /// Vertex index triples.
        triangles: Vec<[u32; 3]>,
    },
    /// Line segments.
    Lines {
        /// Vertex index pairs.
        segments: Vec<[u32; 2]>,
    },
    /// Unconnected points.
    Points,
    /// Streamline polylines, exported as line segments.
    Streamlines {
        /// Vertex index pairs.
        segments: Vec<[u32; 2]>,
    },
    /// A glyph at every vertex.
    Glyphs(GlyphSettings),
}

impl GraphicKind {
    /// Returns the object type name used in exported metadata.
    #[must_use]
    pub fn metadata_type(&self) -> &'static str {
        match self {
            Self::Surfaces { .. } => "Surfaces",
            Self::Lines { .. } | Self::Streamlines { .. } => "Lines",
            Self::Points => "Points",
            Self::Glyphs(_) => "Glyph",
        }
    }

    /// Returns the element indices as a flat list, for bounds checking.
    fn indices(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Self::Surfaces { triangles } => Box::new(triangles.iter().flatten().copied()),
            Self::Lines { segments } | Self::Streamlines { segments } => {
                Box::new(segments.iter().flatten().copied())
            }
            Self::Points | Self::Glyphs(_) => Box::new(std::iter::empty()),
        }
    }
}

/// How a graphic gets its per-vertex colour.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Colouring {
    /// Uniform colour from the graphic's material.
    #[default]
    Material,
    /// Scalar data mapped through a named spectrum.
    Data {
        /// One value per vertex.
        values: TimeSeries<f32>,
        /// Spectrum name, resolved against the scene's spectrum registry.
        spectrum: String,
    },
}

/// One renderable primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    name: String,
    kind: GraphicKind,
    coordinates: TimeSeries<Vec3>,
    colouring: Colouring,
    material: String,
    labels: Option<Vec<String>>,
    texture_coordinates: Option<Vec<Vec2>>,
    visible: bool,
}

impl Graphic {
    /// Creates a graphic of `kind` with the default material.
    pub fn new(name: impl Into<String>, kind: GraphicKind, coordinates: TimeSeries<Vec3>) -> Self {
        Self {
            name: name.into(),
            kind,
            coordinates,
            colouring: Colouring::Material,
            material: DEFAULT_MATERIAL.to_string(),
            labels: None,
            texture_coordinates: None,
            visible: true,
        }
    }

    /// Creates a triangle surface graphic.
    pub fn surfaces(
        name: impl Into<String>,
        coordinates: TimeSeries<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        Self::new(name, GraphicKind::Surfaces { triangles }, coordinates)
    }

    /// Creates a line graphic.
    pub fn lines(
        name: impl Into<String>,
        coordinates: TimeSeries<Vec3>,
        segments: Vec<[u32; 2]>,
    ) -> Self {
        Self::new(name, GraphicKind::Lines { segments }, coordinates)
    }

    /// Creates a point graphic.
    pub fn points(name: impl Into<String>, coordinates: TimeSeries<Vec3>) -> Self {
        Self::new(name, GraphicKind::Points, coordinates)
    }

    /// Creates a streamline graphic from polylines.
    ///
    /// Each polyline becomes a run of connected segments.
    pub fn streamlines(name: impl Into<String>, polylines: &[Vec<Vec3>]) -> Self {
        let mut points = Vec::new();
        let mut segments = Vec::new();
        for line in polylines {
            let start = points.len() as u32;
            points.extend_from_slice(line);
            for i in 1..line.len() as u32 {
                segments.push([start + i - 1, start + i]);
            }
        }
        Self::new(
            name,
            GraphicKind::Streamlines { segments },
            TimeSeries::constant(points),
        )
    }

    /// Creates a glyph graphic.
    pub fn glyphs(
        name: impl Into<String>,
        coordinates: TimeSeries<Vec3>,
        settings: GlyphSettings,
    ) -> Self {
        Self::new(name, GraphicKind::Glyphs(settings), coordinates)
    }

    /// Sets the material by name.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Colours the graphic by scalar data through a spectrum.
    #[must_use]
    pub fn with_data(mut self, values: TimeSeries<f32>, spectrum: impl Into<String>) -> Self {
        self.colouring = Colouring::Data {
            values,
            spectrum: spectrum.into(),
        };
        self
    }

    /// Attaches one label per vertex.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Attaches one texture coordinate per vertex.
    #[must_use]
    pub fn with_texture_coordinates(mut self, uvs: Vec<Vec2>) -> Self {
        self.texture_coordinates = Some(uvs);
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primitive layout.
    #[must_use]
    pub fn kind(&self) -> &GraphicKind {
        &self.kind
    }

    /// Returns the keyframed coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &TimeSeries<Vec3> {
        &self.coordinates
    }

    /// Replaces the coordinates.
    pub fn set_coordinates(&mut self, coordinates: TimeSeries<Vec3>) {
        self.coordinates = coordinates;
    }

    /// Returns the colouring.
    #[must_use]
    pub fn colouring(&self) -> &Colouring {
        &self.colouring
    }

    /// Returns the material name.
    #[must_use]
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Sets the material name.
    pub fn set_material(&mut self, material: impl Into<String>) {
        self.material = material.into();
    }

    /// Returns the labels, if any.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Returns the texture coordinates, if any.
    #[must_use]
    pub fn texture_coordinates(&self) -> Option<&[Vec2]> {
        self.texture_coordinates.as_deref()
    }

    /// Returns whether this graphic is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets the visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns the spectrum name, if coloured by data.
    #[must_use]
    pub fn spectrum(&self) -> Option<&str> {
        match &self.colouring {
            Colouring::Material => None,
            Colouring::Data { spectrum, .. } => Some(spectrum),
        }
    }

    /// Returns the object type name used in exported metadata.
    #[must_use]
    pub fn metadata_type(&self) -> &'static str {
        self.kind.metadata_type()
    }

    /// Returns true if this graphic produces an export resource.
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        self.visible && self.num_vertices() > 0
    }

    /// Returns true if the exported vertex positions change over time.
    #[must_use]
    pub fn has_time_varying_vertices(&self) -> bool {
        self.coordinates.is_time_varying()
            || matches!(
                &self.kind,
                GraphicKind::Glyphs(GlyphSettings { orientation: Some(o), .. }) if o.is_time_varying()
            )
    }

    /// Returns true if the exported colours change over time.
    #[must_use]
    pub fn has_time_varying_colours(&self) -> bool {
        match &self.colouring {
            Colouring::Material => false,
            Colouring::Data { values, .. } => values.is_time_varying(),
        }
    }

    /// Returns the keyframe time range of all time-varying data.
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let mut ranges = vec![self.coordinates.time_range()];
        if let Colouring::Data { values, .. } = &self.colouring {
            ranges.push(values.time_range());
        }
        if let GraphicKind::Glyphs(GlyphSettings {
            orientation: Some(o),
            ..
        }) = &self.kind
        {
            ranges.push(o.time_range());
        }
        ranges
            .into_iter()
            .flatten()
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    /// Checks element indices and per-vertex data lengths.
    pub fn validate(&self) -> Result<()> {
        let count = self.num_vertices();
        if let Some(index) = self.kind.indices().find(|i| *i as usize >= count) {
            return Err(ExportError::IndexOutOfRange {
                graphic: self.name.clone(),
                index,
                count,
            });
        }
        if let Colouring::Data { values, .. } = &self.colouring {
            check_len(count, values.len())?;
        }
        if let GraphicKind::Glyphs(GlyphSettings {
            orientation: Some(o),
            ..
        }) = &self.kind
        {
            check_len(count, o.len())?;
        }
        if let Some(labels) = &self.labels {
            check_len(count, labels.len())?;
        }
        if let Some(uvs) = &self.texture_coordinates {
            check_len(count, uvs.len())?;
        }
        Ok(())
    }

    /// Returns the axis-aligned bounding box of the vertices at `time`.
    #[must_use]
    pub fn bounding_box(&self, time: f64) -> Option<(Vec3, Vec3)> {
        let points = self.coordinates.evaluate(time);
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ExportError::SizeMismatch { expected, actual })
    }
}
