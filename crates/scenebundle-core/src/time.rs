//! Time sampling for exports and keyframed per-vertex data.
//!
//! [`TimeSteps`] describes the discrete sample times an export writes, and
//! [`TimeSeries`] holds data that changes over time, evaluated by linear
//! interpolation between keyframes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// An ordered set of sample times spanning `[initial_time, finish_time]`.
///
/// Sampling is linear and inclusive of both endpoints. A single step samples
/// only the initial time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSteps")]
pub struct TimeSteps {
    count: usize,
    initial_time: f64,
    finish_time: f64,
}

impl TimeSteps {
    /// Creates a validated set of time steps.
    ///
    /// Fails if `count` is zero, if the bounds are not finite, if
    /// `finish_time < initial_time`, or if the range is too narrow for
    /// `count` distinct sample times.
    pub fn new(count: usize, initial_time: f64, finish_time: f64) -> Result<Self> {
        if count == 0 {
            return Err(ExportError::InvalidTimeSteps(count));
        }
        let range_error = ExportError::InvalidTimeRange {
            initial: initial_time,
            finish: finish_time,
        };
        let invalid_range = !initial_time.is_finite()
            || !finish_time.is_finite()
            || finish_time < initial_time
            || (count > 1 && finish_time <= initial_time);
        if invalid_range {
            return Err(range_error);
        }
        let steps = Self {
            count,
            initial_time,
            finish_time,
        };
        // Rounding can collapse neighbouring samples over a span of a few ULPs
        if steps.iter().zip(steps.iter().skip(1)).any(|(a, b)| b <= a) {
            return Err(range_error);
        }
        Ok(steps)
    }

    /// A single sample at `time`.
    pub fn single(time: f64) -> Self {
        Self {
            count: 1,
            initial_time: time,
            finish_time: time,
        }
    }

    /// Returns the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Always false; a `TimeSteps` holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the first sampled time.
    #[must_use]
    pub fn initial_time(&self) -> f64 {
        self.initial_time
    }

    /// Returns the last sampled time.
    #[must_use]
    pub fn finish_time(&self) -> f64 {
        self.finish_time
    }

    /// Returns the time of step `index`.
    ///
    /// The last step returns `finish_time` exactly rather than an accumulated
    /// approximation. Indices past the end clamp to the last step.
    #[must_use]
    pub fn time_at(&self, index: usize) -> f64 {
        if self.count == 1 || index == 0 {
            return self.initial_time;
        }
        if index >= self.count - 1 {
            return self.finish_time;
        }
        let fraction = index as f64 / (self.count - 1) as f64;
        self.initial_time + (self.finish_time - self.initial_time) * fraction
    }

    /// Iterates over all sampled times in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |i| self.time_at(i))
    }
}

/// Unvalidated form of [`TimeSteps`] read from documents.
#[derive(Deserialize)]
struct RawTimeSteps {
    count: usize,
    initial_time: f64,
    finish_time: f64,
}

impl TryFrom<RawTimeSteps> for TimeSteps {
    type Error = ExportError;

    fn try_from(raw: RawTimeSteps) -> Result<Self> {
        Self::new(raw.count, raw.initial_time, raw.finish_time)
    }
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self::single(0.0)
    }
}

/// Values that can be linearly interpolated between keyframes.
pub trait Lerp: Clone {
    /// Interpolates from `self` towards `other` by `t` in `[0, 1]`.
    #[must_use]
    fn lerp_to(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

/// Per-vertex data sampled at keyframe times.
///
/// All keyframes hold the same number of values. Evaluation clamps outside
/// the keyframe range and interpolates linearly inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    /// Keyframes sorted by time.
    keyframes: Vec<(f64, Vec<T>)>,
}

impl<T: Lerp> TimeSeries<T> {
    /// Creates a series that has the same values at every time.
    pub fn constant(values: Vec<T>) -> Self {
        Self {
            keyframes: vec![(0.0, values)],
        }
    }

    /// Creates a series with no keyframes.
    pub fn empty() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }

    /// Adds a keyframe, keeping keyframes sorted by time.
    ///
    /// A keyframe at an existing time replaces it. The first keyframe fixes
    /// the number of values; later ones must match.
    pub fn push_keyframe(&mut self, time: f64, values: Vec<T>) -> Result<()> {
        if let Some((_, first)) = self.keyframes.first() {
            if first.len() != values.len() {
                return Err(ExportError::SizeMismatch {
                    expected: first.len(),
                    actual: values.len(),
                });
            }
        }
        match self
            .keyframes
            .binary_search_by(|(t, _)| t.total_cmp(&time))
        {
            Ok(i) => self.keyframes[i].1 = values,
            Err(i) => self.keyframes.insert(i, (time, values)),
        }
        Ok(())
    }

    /// Builder form of [`push_keyframe`](Self::push_keyframe).
    pub fn with_keyframe(mut self, time: f64, values: Vec<T>) -> Result<Self> {
        self.push_keyframe(time, values)?;
        Ok(self)
    }

    /// Returns the number of values per keyframe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.first().map_or(0, |(_, v)| v.len())
    }

    /// Returns true if the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of keyframes.
    #[must_use]
    pub fn num_keyframes(&self) -> usize {
        self.keyframes.len()
    }

    /// Returns true if the values change over time.
    #[must_use]
    pub fn is_time_varying(&self) -> bool {
        self.keyframes.len() > 1
    }

    /// Returns the first and last keyframe times.
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = self.keyframes.first()?.0;
        let last = self.keyframes.last()?.0;
        Some((first, last))
    }

    /// Evaluates the series at `time`.
    #[must_use]
    pub fn evaluate(&self, time: f64) -> Vec<T> {
        let Some((first_time, first)) = self.keyframes.first() else {
            return Vec::new();
        };
        if self.keyframes.len() == 1 || time <= *first_time {
            return first.clone();
        }
        let upper = self.keyframes.partition_point(|(t, _)| *t <= time);
        if upper >= self.keyframes.len() {
            return self.keyframes[self.keyframes.len() - 1].1.clone();
        }
        let (t0, v0) = &self.keyframes[upper - 1];
        let (t1, v1) = &self.keyframes[upper];
        let fraction = ((time - t0) / (t1 - t0)) as f32;
        v0.iter()
            .zip(v1.iter())
            .map(|(a, b)| a.lerp_to(b, fraction))
            .collect()
    }
}
