//! Export pipeline for scenebundle.
//!
//! Turns a [`Scene`](scenebundle_core::Scene) into a bundle of JSON files:
//! - [`buffer`] allocates in-memory resource buffers
//! - [`serializer`] writes one payload per exportable graphic plus metadata
//! - [`glyph_geometry`] builds the meshes glyph sets are drawn with
//! - [`rewrite`] swaps internal placeholder references for stable file names
//! - [`bundle`] names and persists the files, view last
//! - [`pipeline`] runs the stages in order

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Colour channels and vertex counts are converted between numeric types
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod buffer;
pub mod bundle;
pub mod glyph_geometry;
pub mod metadata;
pub mod payload;
pub mod pipeline;
pub mod rewrite;
pub mod serializer;

pub use buffer::{allocate, ResourceBuffer};
pub use bundle::{Bundle, BundleFile, BundleNaming, BundleSink, DirectorySink, MemorySink};
pub use glyph_geometry::GlyphMesh;
pub use metadata::{Metadata, ObjectEntry, TimeStepInfo};
pub use pipeline::{export_scene, export_scene_to, export_scene_to_dir, ExportPipeline, ExportStage};
pub use rewrite::{ReferenceRewriter, RewriteReport};
pub use serializer::SceneSerializer;
