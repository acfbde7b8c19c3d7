//! The export pipeline: scene in, bundle out.
//!
//! One export runs to completion through a fixed sequence of stages:
//!
//! ```text
//! Idle -> Counting -> Allocating -> Serializing -> Rewriting
//!      -> CapturingView -> Writing -> WritingView -> Idle
//! ```
//!
//! A failure aborts the export and leaves the pipeline at the failing stage.
//! Files already written by a sink are not cleaned up.

use std::fmt;
use std::path::Path;

use scenebundle_core::{ExportOptions, Result, Scene, ViewState};

use crate::buffer::{allocate, ResourceBuffer};
use crate::bundle::{Bundle, BundleFile, BundleNaming, BundleSink, DirectorySink};
use crate::rewrite::ReferenceRewriter;
use crate::serializer::SceneSerializer;

/// Stage of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportStage {
    /// No export in progress.
    #[default]
    Idle,
    /// Counting the resources the scene needs.
    Counting,
    /// Allocating resource buffers.
    Allocating,
    /// Serializing graphics and metadata into buffers, and glyph meshes.
    Serializing,
    /// Rewriting placeholder references in the metadata buffer.
    Rewriting,
    /// Framing content and capturing the camera.
    CapturingView,
    /// Writing metadata, payload and glyph mesh files.
    Writing,
    /// Writing the view file.
    WritingView,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Counting => "counting",
            Self::Allocating => "allocating",
            Self::Serializing => "serializing",
            Self::Rewriting => "rewriting",
            Self::CapturingView => "capturing view",
            Self::Writing => "writing",
            Self::WritingView => "writing view",
        };
        f.write_str(name)
    }
}

/// Runs exports for one set of options.
///
/// Not reentrant: a pipeline runs one export at a time, and concurrent
/// exports with the same prefix into the same sink would overwrite each other.
#[derive(Debug)]
pub struct ExportPipeline<'a> {
    options: &'a ExportOptions,
    naming: BundleNaming,
    stage: ExportStage,
}

impl<'a> ExportPipeline<'a> {
    /// Creates a pipeline, validating the naming options.
    pub fn new(options: &'a ExportOptions) -> Result<Self> {
        Ok(Self {
            options,
            naming: BundleNaming::new(options.prefix.clone(), &options.extension)?,
            stage: ExportStage::Idle,
        })
    }

    /// Returns the current stage; after a failure, the stage that failed.
    #[must_use]
    pub fn stage(&self) -> ExportStage {
        self.stage
    }

    /// Returns the naming scheme.
    #[must_use]
    pub fn naming(&self) -> &BundleNaming {
        &self.naming
    }

    fn enter(&mut self, stage: ExportStage) {
        log::debug!("export '{}': {} -> {}", self.naming.prefix(), self.stage, stage);
        self.stage = stage;
    }

    /// Serializes `scene` and captures `view` into an in-memory bundle.
    ///
    /// When the options ask for it, `view` is first reset to frame all
    /// exportable content at the initial time.
    pub fn build(&mut self, scene: &Scene, view: &mut ViewState) -> Result<Bundle> {
        self.enter(ExportStage::Counting);
        let serializer = SceneSerializer::new(self.options)?;
        let count = serializer.resources_required(scene);

        self.enter(ExportStage::Allocating);
        let mut buffers = allocate(count);

        self.enter(ExportStage::Serializing);
        let glyph_geometries = serializer.write(scene, &self.naming, &mut buffers)?;

        self.enter(ExportStage::Rewriting);
        ReferenceRewriter::new(&self.naming, self.options.strict_references)
            .rewrite(&mut buffers)?;

        self.enter(ExportStage::CapturingView);
        if self.options.view_all {
            if let Some(bounds) = scene.bounding_box(serializer.time_steps().initial_time()) {
                view.view_all(bounds, self.options.view_angle);
            }
        }
        let view_file = BundleFile {
            name: self.naming.view_name(),
            bytes: serde_json::to_vec(view)?,
        };

        let mut files = buffers.into_iter().map(|buffer: ResourceBuffer| BundleFile {
            name: self.naming.buffer_name(buffer.index()),
            bytes: buffer.into_bytes(),
        });
        let metadata = files
            .next()
            .unwrap_or_else(|| BundleFile {
                name: self.naming.metadata_name(),
                bytes: Vec::new(),
            });
        let bundle = Bundle {
            metadata,
            payloads: files.collect(),
            glyph_geometries,
            view: view_file,
        };

        self.enter(ExportStage::Idle);
        Ok(bundle)
    }

    /// Builds the bundle and writes it to `sink`, view last.
    pub fn run(
        &mut self,
        scene: &Scene,
        view: &mut ViewState,
        sink: &mut dyn BundleSink,
    ) -> Result<Bundle> {
        let bundle = self.build(scene, view)?;

        self.enter(ExportStage::Writing);
        bundle.write_buffers(sink)?;

        self.enter(ExportStage::WritingView);
        bundle.write_view(sink)?;

        self.enter(ExportStage::Idle);
        log::info!(
            "exported {} graphics as '{}' ({} files)",
            bundle.payloads.len(),
            self.naming.prefix(),
            bundle.len()
        );
        Ok(bundle)
    }
}

/// Exports `scene` into an in-memory bundle.
pub fn export_scene(scene: &Scene, view: &mut ViewState, options: &ExportOptions) -> Result<Bundle> {
    ExportPipeline::new(options)?.build(scene, view)
}

/// Exports `scene` and writes the bundle to `sink`.
pub fn export_scene_to(
    scene: &Scene,
    view: &mut ViewState,
    options: &ExportOptions,
    sink: &mut dyn BundleSink,
) -> Result<Bundle> {
    ExportPipeline::new(options)?.run(scene, view, sink)
}

/// Exports `scene` into files under `dir`.
pub fn export_scene_to_dir(
    scene: &Scene,
    view: &mut ViewState,
    options: &ExportOptions,
    dir: impl AsRef<Path>,
) -> Result<Bundle> {
    let mut sink = DirectorySink::new(dir)?;
    export_scene_to(scene, view, options, &mut sink)
}
