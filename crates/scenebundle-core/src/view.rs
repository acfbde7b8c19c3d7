//! Camera state captured alongside an exported scene.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera parameters written to the view document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Far clipping plane distance.
    pub far_plane: f32,
    /// Near clipping plane distance.
    pub near_plane: f32,
    /// Camera position.
    pub eye_position: Vec3,
    /// Point the camera looks at.
    pub target_position: Vec3,
    /// Camera up direction.
    pub up_vector: Vec3,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            far_plane: 100.0,
            near_plane: 0.1,
            eye_position: Vec3::new(0.0, 0.0, 5.0),
            target_position: Vec3::ZERO,
            up_vector: Vec3::Y,
        }
    }
}

impl ViewState {
    /// Creates a view looking from `eye` at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            eye_position: eye,
            target_position: target,
            up_vector: up,
            ..Self::default()
        }
    }

    /// Sets the clipping planes.
    #[must_use]
    pub fn with_clipping_planes(mut self, near: f32, far: f32) -> Self {
        self.near_plane = near;
        self.far_plane = far;
        self
    }

    /// Returns the unit vector from the target towards the eye.
    ///
    /// Falls back to +Z when eye and target coincide.
    #[must_use]
    pub fn view_direction(&self) -> Vec3 {
        (self.eye_position - self.target_position)
            .try_normalize()
            .unwrap_or(Vec3::Z)
    }

    /// Returns the distance from the eye to the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.eye_position.distance(self.target_position)
    }

    /// Frames the bounding box `(min, max)` in a view of `view_angle_degrees`.
    ///
    /// The view direction and up vector are kept; the camera targets the box
    /// centre and backs off until the bounding sphere fits.
    pub fn view_all(&mut self, bounding_box: (Vec3, Vec3), view_angle_degrees: f32) {
        let (min, max) = bounding_box;
        let centre = (min + max) * 0.5;
        let mut radius = (max - min).length() * 0.5;
        if radius <= f32::EPSILON {
            radius = 1.0;
        }
        let half_angle = (view_angle_degrees.clamp(1.0, 179.0) * 0.5).to_radians();
        let distance = radius / half_angle.sin();
        let direction = self.view_direction();

        self.target_position = centre;
        self.eye_position = centre + direction * distance;
        self.near_plane = (distance - 2.0 * radius).max(0.01 * distance);
        self.far_plane = distance + 2.0 * radius;
        log::debug!(
            "view_all: centre {centre}, radius {radius}, eye {}",
            self.eye_position
        );
    }
}
