//! Unit meshes for glyph shapes.
//!
//! A glyph set payload only places and orients glyphs; the loader fetches
//! the shape itself as a separate three.js geometry. Shapes are built in
//! glyph space: axis 1 is +X, and a unit glyph spans `[0, 1]` along axis 1
//! with diameter 1 across axes 2 and 3. Cubes, spheres and points are
//! centred on the origin instead.

use std::f32::consts::TAU;

use glam::Vec3;

use scenebundle_core::{GlyphShape, Material};

use crate::payload::{flatten, GeometryMetadata, MaterialEntry, ThreeJsGeometry};

const SEGMENTS: u32 = 12;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Outward-facing triangles.
    pub triangles: Vec<[u32; 3]>,
}

impl GlyphMesh {
    /// Builds the unit mesh for `shape`.
    #[must_use]
    pub fn for_shape(shape: GlyphShape) -> Self {
        match shape {
            GlyphShape::Arrow => arrow(Vec3::X, Vec3::Y, Vec3::Z),
            GlyphShape::Cone => cone(0.5, 0.0, 1.0),
            GlyphShape::Cube => cube(),
            GlyphShape::Cylinder => cylinder(0.5, 0.0, 1.0),
            GlyphShape::Sphere => sphere(0.5, 8, 16),
            GlyphShape::Point => sphere(0.05, 3, 4),
            GlyphShape::Line => cylinder(0.02, 0.0, 1.0),
            GlyphShape::Axes => {
                let mut mesh = arrow(Vec3::X, Vec3::Y, Vec3::Z);
                mesh.append(arrow(Vec3::Y, Vec3::Z, Vec3::X));
                mesh.append(arrow(Vec3::Z, Vec3::X, Vec3::Y));
                mesh
            }
        }
    }

    /// Appends `other`, offsetting its indices.
    pub fn append(&mut self, other: GlyphMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|[a, b, c]| [a + base, b + base, c + base]),
        );
    }

    /// Maps glyph-space X, Y, Z onto the given axes.
    fn reoriented(mut self, axis1: Vec3, axis2: Vec3, axis3: Vec3) -> Self {
        for v in &mut self.vertices {
            *v = axis1 * v.x + axis2 * v.y + axis3 * v.z;
        }
        self
    }

    /// Converts the mesh into a three.js geometry drawn with `material`.
    #[must_use]
    pub fn to_geometry(&self, name: &str, material: &Material) -> ThreeJsGeometry {
        let faces = self
            .triangles
            .iter()
            .flat_map(|[a, b, c]| [0, *a, *b, *c])
            .collect();
        ThreeJsGeometry {
            metadata: GeometryMetadata {
                format_version: 3,
                generated_by: "scenebundle",
                vertices: self.vertices.len(),
                faces: self.triangles.len(),
                colors: 0,
                uvs: 0,
                morph_targets: 0,
            },
            materials: vec![MaterialEntry::new(name, material, false)],
            vertices: flatten(&self.vertices),
            faces,
            lines: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            morph_targets: Vec::new(),
            morph_colors: Vec::new(),
            values: None,
            morph_values: Vec::new(),
            spectrum: None,
        }
    }
}

/// Unit-circle point at step `j` of the ring, in the YZ plane.
fn ring_point(j: u32, radius: f32, x: f32) -> Vec3 {
    let theta = TAU * j as f32 / SEGMENTS as f32;
    Vec3::new(x, radius * theta.cos(), radius * theta.sin())
}

/// A capped cylinder along +X from `x0` to `x1`.
fn cylinder(radius: f32, x0: f32, x1: f32) -> GlyphMesh {
    let n = SEGMENTS;
    let mut vertices: Vec<Vec3> = (0..n).map(|j| ring_point(j, radius, x0)).collect();
    vertices.extend((0..n).map(|j| ring_point(j, radius, x1)));
    vertices.push(Vec3::new(x0, 0.0, 0.0));
    vertices.push(Vec3::new(x1, 0.0, 0.0));
    let (start_centre, end_centre) = (2 * n, 2 * n + 1);

    let mut triangles = Vec::with_capacity(4 * n as usize);
    for j in 0..n {
        let (a, b) = (j, (j + 1) % n);
        let (c, d) = (n + a, n + b);
        triangles.push([a, b, d]);
        triangles.push([a, d, c]);
        triangles.push([start_centre, b, a]);
        triangles.push([end_centre, c, d]);
    }
    GlyphMesh {
        vertices,
        triangles,
    }
}

/// A cone along +X with its base at `x0` and apex at `x1`.
fn cone(radius: f32, x0: f32, x1: f32) -> GlyphMesh {
    let n = SEGMENTS;
    let mut vertices: Vec<Vec3> = (0..n).map(|j| ring_point(j, radius, x0)).collect();
    vertices.push(Vec3::new(x1, 0.0, 0.0));
    vertices.push(Vec3::new(x0, 0.0, 0.0));
    let (apex, centre) = (n, n + 1);

    let mut triangles = Vec::with_capacity(2 * n as usize);
    for j in 0..n {
        let (a, b) = (j, (j + 1) % n);
        triangles.push([a, b, apex]);
        triangles.push([centre, b, a]);
    }
    GlyphMesh {
        vertices,
        triangles,
    }
}

/// A solid arrow along `axis1`: a shaft over the first two thirds and a head.
fn arrow(axis1: Vec3, axis2: Vec3, axis3: Vec3) -> GlyphMesh {
    let mut mesh = cylinder(1.0 / 6.0, 0.0, 2.0 / 3.0);
    mesh.append(cone(0.5, 2.0 / 3.0, 1.0));
    mesh.reoriented(axis1, axis2, axis3)
}

/// A unit cube centred on the origin.
fn cube() -> GlyphMesh {
    // Bits 0, 1 and 2 of the vertex index select x, y and z
    let vertices = (0..8u32)
        .map(|i| {
            Vec3::new(
                (i & 1) as f32 - 0.5,
                ((i >> 1) & 1) as f32 - 0.5,
                ((i >> 2) & 1) as f32 - 0.5,
            )
        })
        .collect();
    let quads = [
        [0, 4, 6, 2],
        [1, 3, 7, 5],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 2, 3, 1],
        [4, 5, 7, 6],
    ];
    let triangles = quads
        .iter()
        .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
        .collect();
    GlyphMesh {
        vertices,
        triangles,
    }
}

/// A UV sphere centred on the origin.
fn sphere(radius: f32, n_lat: u32, n_lon: u32) -> GlyphMesh {
    let mut vertices = Vec::with_capacity(((n_lat + 1) * n_lon) as usize);
    for i in 0..=n_lat {
        let polar = std::f32::consts::PI * i as f32 / n_lat as f32;
        for j in 0..n_lon {
            let azimuth = TAU * j as f32 / n_lon as f32;
            vertices.push(
                Vec3::new(
                    polar.cos(),
                    polar.sin() * azimuth.cos(),
                    polar.sin() * azimuth.sin(),
                ) * radius,
            );
        }
    }
    let mut triangles = Vec::with_capacity((2 * n_lat * n_lon) as usize);
    for i in 0..n_lat {
        for j in 0..n_lon {
            let a = i * n_lon + j;
            let b = i * n_lon + (j + 1) % n_lon;
            let c = (i + 1) * n_lon + j;
            let d = (i + 1) * n_lon + (j + 1) % n_lon;
            triangles.push([a, c, d]);
            triangles.push([a, d, b]);
        }
    }
    GlyphMesh {
        vertices,
        triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [GlyphShape; 8] = [
        GlyphShape::Arrow,
        GlyphShape::Cone,
        GlyphShape::Cube,
        GlyphShape::Cylinder,
        GlyphShape::Sphere,
        GlyphShape::Point,
        GlyphShape::Line,
        GlyphShape::Axes,
    ];

    #[test]
    fn test_indices_in_range() {
        for shape in SHAPES {
            let mesh = GlyphMesh::for_shape(shape);
            assert!(!mesh.triangles.is_empty(), "{shape:?} has no faces");
            let count = mesh.vertices.len() as u32;
            assert!(
                mesh.triangles.iter().flatten().all(|i| *i < count),
                "{shape:?} indexes past its vertices"
            );
        }
    }

    #[test]
    fn test_arrow_spans_axis1() {
        let mesh = GlyphMesh::for_shape(GlyphShape::Arrow);
        let (min, max) = mesh
            .vertices
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        assert_eq!(min.x, 0.0);
        assert_eq!(max.x, 1.0);
        assert!((max.y - 0.5).abs() < 1e-6);
        assert!((min.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cube_faces_outward() {
        let mesh = GlyphMesh::for_shape(GlyphShape::Cube);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangles.len(), 12);
        for [a, b, c] in &mesh.triangles {
            let (pa, pb, pc) = (
                mesh.vertices[*a as usize],
                mesh.vertices[*b as usize],
                mesh.vertices[*c as usize],
            );
            let normal = (pb - pa).cross(pc - pa);
            let centre = (pa + pb + pc) / 3.0;
            assert!(normal.dot(centre) > 0.0);
        }
    }

    #[test]
    fn test_axes_has_three_arrows() {
        let arrow = GlyphMesh::for_shape(GlyphShape::Arrow);
        let axes = GlyphMesh::for_shape(GlyphShape::Axes);
        assert_eq!(axes.vertices.len(), 3 * arrow.vertices.len());
        assert_eq!(axes.triangles.len(), 3 * arrow.triangles.len());
    }

    #[test]
    fn test_to_geometry() {
        let mesh = GlyphMesh::for_shape(GlyphShape::Cube);
        let geometry = mesh.to_geometry("fibres", &Material::new("gold"));
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["metadata"]["faces"], 12);
        assert_eq!(json["faces"].as_array().unwrap().len(), 48);
        assert_eq!(json["faces"][0], 0);
        assert_eq!(json["vertices"].as_array().unwrap().len(), 24);
        assert_eq!(json["materials"][0]["DbgName"], "fibres");
        assert!(json.get("uvs").is_none());
    }
}
