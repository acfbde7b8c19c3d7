//! scenebundle: snapshot renderable scenes into streamable WebGL JSON bundles.
//!
//! A scene is a set of graphics (surfaces, lines, points, streamlines,
//! glyphs) with keyframed coordinates and colour data. Exporting it writes a
//! bundle that a separate WebGL renderer can play back.
//!
//! # Quick Start
//!
//! ```no_run
//! use scenebundle::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut scene = Scene::new("example");
//!     let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
//!     scene.add_graphic(Graphic::surfaces(
//!         "triangle",
//!         TimeSeries::constant(points),
//!         vec![[0, 1, 2]],
//!     ))?;
//!
//!     let options = ExportOptions::with_prefix("example");
//!     let mut view = ViewState::default();
//!     export_scene_to_dir(&scene, &mut view, &options, "html")?;
//!     Ok(())
//! }
//! ```
//!
//! # Bundle layout
//!
//! - `{prefix}_metadata.json` lists every exported object, its payload file,
//!   and the sampled time steps
//! - `{prefix}_{k}.json` holds the geometry and colours of object `k`
//! - `{prefix}_glyph_{k}.json` holds the glyph mesh when object `k` is a glyph set
//! - `{prefix}_view.json` holds the camera, written last

// Re-export core types
pub use scenebundle_core::{
    error::{ExportError, Result},
    graphic::{Colouring, GlyphSettings, GlyphShape, Graphic, GraphicKind},
    material::{Material, MaterialRegistry, DEFAULT_MATERIAL},
    options::{ExportOptions, IoDataType, IoFormat},
    scene::Scene,
    spectrum::{ColourMapping, ScaleType, Spectrum, SpectrumComponent, SpectrumRegistry},
    time::{TimeSeries, TimeSteps},
    view::ViewState,
    Vec2, Vec3,
};

// Re-export the pipeline
pub use scenebundle_export::{
    export_scene, export_scene_to, export_scene_to_dir, Bundle, BundleFile, BundleNaming,
    BundleSink, DirectorySink, ExportPipeline, ExportStage, GlyphMesh, MemorySink, Metadata,
    ObjectEntry,
};

/// Initializes logging from the `RUST_LOG` environment variable.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Exports `scene` into `dir` using options read from a JSON file.
///
/// Missing keys in the file take their default values.
pub fn export_with_config(
    scene: &Scene,
    view: &mut ViewState,
    config: impl AsRef<std::path::Path>,
    dir: impl AsRef<std::path::Path>,
) -> Result<Bundle> {
    let options = ExportOptions::from_json_file(config)?;
    log::info!(
        "exporting region '{}' with prefix '{}'",
        scene.region(),
        options.prefix
    );
    export_scene_to_dir(scene, view, &options, dir)
}
