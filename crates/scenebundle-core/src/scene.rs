//! The scene: an ordered set of graphics plus the registries they refer to.
//!
//! Insertion order is significant. It fixes the order in which exportable
//! graphics are enumerated, and therefore the numbering of exported files.

use glam::Vec3;

use crate::error::{ExportError, Result};
use crate::graphic::Graphic;
use crate::material::MaterialRegistry;
use crate::spectrum::SpectrumRegistry;

/// Graphics owned by a region, with the materials and spectra they use.
#[derive(Debug, Clone)]
pub struct Scene {
    region: String,
    graphics: Vec<Graphic>,
    materials: MaterialRegistry,
    spectra: SpectrumRegistry,
}

impl Scene {
    /// Creates an empty scene for `region` with the standard materials defined.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            graphics: Vec::new(),
            materials: MaterialRegistry::with_standard_materials(),
            spectra: SpectrumRegistry::new(),
        }
    }

    /// Returns the region name.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Adds a graphic at the end of the scene.
    ///
    /// The graphic is validated first; names must be unique.
    pub fn add_graphic(&mut self, graphic: Graphic) -> Result<()> {
        if self.contains(graphic.name()) {
            return Err(ExportError::GraphicExists(graphic.name().to_string()));
        }
        graphic.validate()?;
        log::debug!(
            "added {} graphic '{}' to region '{}'",
            graphic.metadata_type(),
            graphic.name(),
            self.region
        );
        self.graphics.push(graphic);
        Ok(())
    }

    /// Returns true if a graphic with `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.graphics.iter().any(|g| g.name() == name)
    }

    /// Gets a graphic by name.
    #[must_use]
    pub fn graphic(&self, name: &str) -> Option<&Graphic> {
        self.graphics.iter().find(|g| g.name() == name)
    }

    /// Gets a mutable graphic by name.
    pub fn graphic_mut(&mut self, name: &str) -> Option<&mut Graphic> {
        self.graphics.iter_mut().find(|g| g.name() == name)
    }

    /// Removes a graphic by name, preserving the order of the rest.
    pub fn remove_graphic(&mut self, name: &str) -> Result<Graphic> {
        let index = self
            .graphics
            .iter()
            .position(|g| g.name() == name)
            .ok_or_else(|| ExportError::GraphicNotFound(name.to_string()))?;
        Ok(self.graphics.remove(index))
    }

    /// Returns all graphics in insertion order.
    #[must_use]
    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    /// Returns the graphics that produce an export resource, in insertion order.
    pub fn exportable_graphics(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter().filter(|g| g.is_exportable())
    }

    /// Returns the number of exportable graphics.
    #[must_use]
    pub fn num_exportable(&self) -> usize {
        self.exportable_graphics().count()
    }

    /// Returns the material registry.
    #[must_use]
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Returns the material registry for modification.
    pub fn materials_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.materials
    }

    /// Returns the spectrum registry.
    #[must_use]
    pub fn spectra(&self) -> &SpectrumRegistry {
        &self.spectra
    }

    /// Returns the spectrum registry for modification.
    pub fn spectra_mut(&mut self) -> &mut SpectrumRegistry {
        &mut self.spectra
    }

    /// Returns the bounding box of all exportable graphics at `time`.
    #[must_use]
    pub fn bounding_box(&self, time: f64) -> Option<(Vec3, Vec3)> {
        self.exportable_graphics()
            .filter_map(|g| g.bounding_box(time))
            .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
    }

    /// Returns the keyframe time range spanned by all graphics.
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.graphics
            .iter()
            .filter_map(Graphic::time_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }
}
