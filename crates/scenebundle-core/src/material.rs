//! Materials describing the lit appearance of graphics.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::registry::{Named, Registry};

/// A phong-style material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    name: String,
    /// Ambient colour.
    pub ambient: Vec3,
    /// Diffuse colour.
    pub diffuse: Vec3,
    /// Emissive colour.
    pub emission: Vec3,
    /// Specular colour.
    pub specular: Vec3,
    /// Shininess in `[0, 1]`.
    pub shininess: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Diffuse texture image, relative to the bundle directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

impl Material {
    /// Creates a white, fully opaque material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            emission: Vec3::ZERO,
            specular: Vec3::ZERO,
            shininess: 0.0,
            alpha: 1.0,
            texture: None,
        }
    }

    fn standard(name: &str, ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            ..Self::new(name)
        }
    }

    /// Sets the ambient and diffuse colours together.
    #[must_use]
    pub fn with_colour(mut self, ambient: Vec3, diffuse: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self
    }

    /// Sets the specular colour and shininess.
    #[must_use]
    pub fn with_specular(mut self, specular: Vec3, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess.clamp(0.0, 1.0);
        self
    }

    /// Sets the emissive colour.
    #[must_use]
    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Sets the diffuse texture image.
    ///
    /// Graphics using the material need texture coordinates for it to show.
    #[must_use]
    pub fn with_texture(mut self, image: impl Into<String>) -> Self {
        self.texture = Some(image.into());
        self
    }

    /// Returns true if the material is not fully opaque.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

impl Named for Material {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists_error(name: String) -> ExportError {
        ExportError::MaterialExists(name)
    }

    fn not_found_error(name: String) -> ExportError {
        ExportError::MaterialNotFound(name)
    }
}

/// Registry of materials keyed by name.
pub type MaterialRegistry = Registry<Material>;

impl Registry<Material> {
    /// Registers the standard material palette.
    ///
    /// Existing materials with the same names are left untouched.
    pub fn define_standard_materials(&mut self) {
        for material in standard_materials() {
            if !self.contains(material.name()) {
                self.upsert(material);
            }
        }
    }

    /// Creates a registry holding the standard palette.
    pub fn with_standard_materials() -> Self {
        let mut registry = Self::new();
        registry.define_standard_materials();
        registry
    }

    /// Registers `material`, failing if the name is taken.
    pub fn create_material(&mut self, material: Material) -> Result<()> {
        self.register(material)
    }
}

/// The default material name applied to new graphics.
pub const DEFAULT_MATERIAL: &str = "default";

fn standard_materials() -> Vec<Material> {
    let v = Vec3::new;
    vec![
        Material::new(DEFAULT_MATERIAL),
        Material::standard("black", v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(0.3, 0.3, 0.3), 0.2),
        Material::standard("blue", v(0.0, 0.0, 0.5), v(0.0, 0.0, 1.0), v(0.2, 0.2, 0.2), 0.2),
        Material::standard("bone", v(0.7, 0.7, 0.6), v(0.9, 0.9, 0.7), v(0.1, 0.1, 0.1), 0.2),
        Material::standard("brown", v(0.25, 0.1, 0.05), v(0.5, 0.25, 0.1), v(0.1, 0.1, 0.1), 0.2),
        Material::standard("copper", v(1.0, 0.2, 0.0), v(0.6, 0.3, 0.0), v(0.7, 0.7, 0.5), 0.3),
        Material::standard("gold", v(1.0, 0.4, 0.0), v(1.0, 0.7, 0.0), v(0.5, 0.5, 0.5), 0.3),
        Material::standard("gray50", v(0.5, 0.5, 0.5), v(0.5, 0.5, 0.5), v(0.2, 0.2, 0.2), 0.2),
        Material::standard("green", v(0.0, 0.5, 0.0), v(0.0, 1.0, 0.0), v(0.2, 0.2, 0.2), 0.1),
        Material::standard("muscle", v(0.4, 0.14, 0.11), v(0.5, 0.12, 0.1), v(0.3, 0.5, 0.5), 0.2),
        Material::standard("orange", v(1.0, 0.25, 0.0), v(1.0, 0.5, 0.0), v(0.5, 0.5, 0.5), 0.3),
        Material::standard("red", v(0.5, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.2, 0.2, 0.2), 0.2),
        Material::standard("silver", v(0.4, 0.4, 0.4), v(0.7, 0.7, 0.7), v(0.5, 0.5, 0.5), 0.3),
        Material::standard("tissue", v(0.9, 0.7, 0.5), v(0.9, 0.7, 0.5), v(0.2, 0.2, 0.3), 0.2),
        Material::standard("white", v(1.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 0.0, 0.0), 0.0),
        Material::standard("yellow", v(0.9, 0.9, 0.0), v(0.9, 0.9, 0.0), v(0.1, 0.1, 0.1), 0.2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_materials() {
        let registry = MaterialRegistry::with_standard_materials();
        assert_eq!(registry.len(), 16);
        for name in ["default", "copper", "muscle", "tissue", "yellow"] {
            assert!(registry.contains(name), "missing {name}");
        }
        let red = registry.get("red").unwrap();
        assert_eq!(red.diffuse, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_define_keeps_custom_material() {
        let mut registry = MaterialRegistry::new();
        registry
            .create_material(Material::new("copper").with_alpha(0.5))
            .unwrap();
        registry.define_standard_materials();
        assert!(registry.get("copper").unwrap().is_transparent());
    }

    #[test]
    fn test_duplicate_material() {
        let mut registry = MaterialRegistry::with_standard_materials();
        let err = registry.create_material(Material::new("gold")).unwrap_err();
        assert!(matches!(err, ExportError::MaterialExists(_)));
    }

    #[test]
    fn test_builder_clamps() {
        let material = Material::new("glass")
            .with_alpha(1.5)
            .with_specular(Vec3::ONE, -1.0);
        assert_eq!(material.alpha, 1.0);
        assert_eq!(material.shininess, 0.0);
    }

    #[test]
    fn test_texture_material() {
        let material = Material::new("texture").with_texture("checker.png");
        assert_eq!(material.texture.as_deref(), Some("checker.png"));
        assert!(Material::new("plain").texture.is_none());

        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["texture"], "checker.png");
        let plain = serde_json::to_value(Material::new("plain")).unwrap();
        assert!(plain.get("texture").is_none());
    }
}
