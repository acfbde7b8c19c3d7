//! Core model for scenebundle.
//!
//! This crate provides the backend-independent scene model that the export
//! pipeline reads:
//! - [`Scene`] and [`Graphic`] for renderable primitives in insertion order
//! - [`TimeSteps`] and [`TimeSeries`] for time sampling and keyframed data
//! - [`Material`] and [`Spectrum`] registries for colouring
//! - [`ViewState`] for the captured camera
//! - [`ExportOptions`] for configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Vertex indices and time fractions are converted between integer and float types
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod graphic;
pub mod material;
pub mod options;
pub mod registry;
pub mod scene;
pub mod spectrum;
pub mod time;
pub mod view;

pub use error::{ExportError, Result};
pub use graphic::{Colouring, GlyphSettings, GlyphShape, Graphic, GraphicKind};
pub use material::{Material, MaterialRegistry, DEFAULT_MATERIAL};
pub use options::{ExportOptions, IoDataType, IoFormat};
pub use registry::{Named, Registry};
pub use scene::Scene;
pub use spectrum::{ColourMapping, ScaleType, Spectrum, SpectrumComponent, SpectrumRegistry};
pub use time::{Lerp, TimeSeries, TimeSteps};
pub use view::ViewState;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
