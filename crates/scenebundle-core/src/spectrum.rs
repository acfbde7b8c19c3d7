//! Spectra map scalar data values to colours.
//!
//! A [`Spectrum`] is a stack of [`SpectrumComponent`]s. Each component covers
//! a data range and maps it through a colour ramp; the spectrum colour is the
//! product of every component that applies to the value.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::registry::{Named, Registry};

/// The colour ramp a component maps its normalised value through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColourMapping {
    /// Blue through cyan, green and yellow to red.
    #[default]
    Rainbow,
    /// Black to red.
    Red,
    /// Black to green.
    Green,
    /// Black to blue.
    Blue,
    /// White to red.
    WhiteToRed,
    /// White to blue.
    WhiteToBlue,
    /// White to green.
    WhiteToGreen,
    /// Black to white.
    Monochrome,
}

impl ColourMapping {
    /// Maps `t` in `[0, 1]` to a colour.
    #[must_use]
    pub fn colour(self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Rainbow => {
                if t < 1.0 / 3.0 {
                    Vec3::new(0.0, 3.0 * t, 1.0)
                } else if t < 2.0 / 3.0 {
                    Vec3::new(3.0 * t - 1.0, 1.0, 2.0 - 3.0 * t)
                } else {
                    Vec3::new(1.0, 3.0 - 3.0 * t, 0.0)
                }
            }
            Self::Red => Vec3::new(t, 0.0, 0.0),
            Self::Green => Vec3::new(0.0, t, 0.0),
            Self::Blue => Vec3::new(0.0, 0.0, t),
            Self::WhiteToRed => Vec3::new(1.0, 1.0 - t, 1.0 - t),
            Self::WhiteToBlue => Vec3::new(1.0 - t, 1.0 - t, 1.0),
            Self::WhiteToGreen => Vec3::new(1.0 - t, 1.0, 1.0 - t),
            Self::Monochrome => Vec3::splat(t),
        }
    }
}

/// How data values are scaled across a component's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleType {
    /// Values map linearly.
    #[default]
    Linear,
    /// Values map logarithmically, controlled by the exaggeration.
    Log,
}

/// One colour-mapped range of a spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumComponent {
    /// Data value mapped to the start of the colour range.
    pub range_minimum: f32,
    /// Data value mapped to the end of the colour range.
    pub range_maximum: f32,
    /// Start of the colour ramp used, as a fraction.
    pub colour_minimum: f32,
    /// End of the colour ramp used, as a fraction.
    pub colour_maximum: f32,
    /// Colour ramp.
    pub colour_mapping: ColourMapping,
    /// Linear or logarithmic scaling.
    pub scale_type: ScaleType,
    /// Log scale strength. Positive values expand the low end, negative the high end.
    pub exaggeration: f32,
    /// Whether values below the range clamp to the minimum colour.
    pub extend_below: bool,
    /// Whether values above the range clamp to the maximum colour.
    pub extend_above: bool,
    /// Whether the ramp runs backwards.
    pub colour_reverse: bool,
}

impl Default for SpectrumComponent {
    fn default() -> Self {
        Self {
            range_minimum: 0.0,
            range_maximum: 1.0,
            colour_minimum: 0.0,
            colour_maximum: 1.0,
            colour_mapping: ColourMapping::Rainbow,
            scale_type: ScaleType::Linear,
            exaggeration: 1.0,
            extend_below: true,
            extend_above: true,
            colour_reverse: false,
        }
    }
}

impl SpectrumComponent {
    /// Creates a component covering `[minimum, maximum]` with `mapping`.
    pub fn new(minimum: f32, maximum: f32, mapping: ColourMapping) -> Self {
        Self {
            range_minimum: minimum,
            range_maximum: maximum,
            colour_mapping: mapping,
            ..Self::default()
        }
    }

    /// Sets which sides of the range extend.
    #[must_use]
    pub fn with_extend(mut self, below: bool, above: bool) -> Self {
        self.extend_below = below;
        self.extend_above = above;
        self
    }

    /// Uses a log scale with the given exaggeration.
    #[must_use]
    pub fn with_log_scale(mut self, exaggeration: f32) -> Self {
        self.scale_type = ScaleType::Log;
        self.exaggeration = exaggeration;
        self
    }

    /// Reverses the colour ramp.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.colour_reverse = !self.colour_reverse;
        self
    }

    /// Returns the colour for `value`, or `None` if this component does not apply.
    #[must_use]
    pub fn evaluate(&self, value: f32) -> Option<Vec3> {
        if value < self.range_minimum && !self.extend_below {
            return None;
        }
        if value > self.range_maximum && !self.extend_above {
            return None;
        }
        let span = self.range_maximum - self.range_minimum;
        let mut t = if span > 0.0 {
            ((value - self.range_minimum) / span).clamp(0.0, 1.0)
        } else if value <= self.range_minimum {
            0.0
        } else {
            1.0
        };
        if self.scale_type == ScaleType::Log {
            t = log_scale(t, self.exaggeration);
        }
        if self.colour_reverse {
            t = 1.0 - t;
        }
        let t = self.colour_minimum + t * (self.colour_maximum - self.colour_minimum);
        Some(self.colour_mapping.colour(t))
    }
}

fn log_scale(t: f32, exaggeration: f32) -> f32 {
    if exaggeration > 0.0 {
        (1.0 + exaggeration * t).ln() / (1.0 + exaggeration).ln()
    } else if exaggeration < 0.0 {
        let e = -exaggeration;
        1.0 - (1.0 + e * (1.0 - t)).ln() / (1.0 + e).ln()
    } else {
        t
    }
}

/// A named stack of colour components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    name: String,
    components: Vec<SpectrumComponent>,
}

impl Spectrum {
    /// Creates a spectrum with no components.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Creates a single-component rainbow spectrum over `[minimum, maximum]`.
    pub fn rainbow(name: impl Into<String>, minimum: f32, maximum: f32) -> Self {
        Self::new(name).with_component(SpectrumComponent::new(
            minimum,
            maximum,
            ColourMapping::Rainbow,
        ))
    }

    /// Appends a component.
    #[must_use]
    pub fn with_component(mut self, component: SpectrumComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Appends a component.
    pub fn add_component(&mut self, component: SpectrumComponent) {
        self.components.push(component);
    }

    /// Returns the components.
    #[must_use]
    pub fn components(&self) -> &[SpectrumComponent] {
        &self.components
    }

    /// Returns the colour for `value`.
    #[must_use]
    pub fn evaluate(&self, value: f32) -> Vec3 {
        self.components
            .iter()
            .filter_map(|c| c.evaluate(value))
            .fold(Vec3::ONE, |acc, colour| acc * colour)
    }

    /// Returns the colours for a slice of values.
    #[must_use]
    pub fn evaluate_all(&self, values: &[f32]) -> Vec<Vec3> {
        values.iter().map(|v| self.evaluate(*v)).collect()
    }
}

impl Named for Spectrum {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists_error(name: String) -> ExportError {
        ExportError::SpectrumExists(name)
    }

    fn not_found_error(name: String) -> ExportError {
        ExportError::SpectrumNotFound(name)
    }
}

/// Registry of spectra keyed by name.
pub type SpectrumRegistry = Registry<Spectrum>;
