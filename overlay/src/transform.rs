//! Overlay transform state and its rendering forms.
//!
//! [`TransformState`] is the single source of truth for where the imported
//! image sits over the camera feed. Controls and gestures mutate it; the
//! renderer reads it back as a CSS transform string, a 4×4 matrix, or a 2D
//! affine for canvas export.
//!
//! Composition order is fixed: translate, scale, rotateX, rotateY, rotateZ,
//! then the optional mirror flip. The flip comes last, so a mirrored and
//! rotated overlay rotates in the mirrored frame.

use std::str::FromStr;

use glam::{DMat4, DVec3};
use serde::Serialize;

use crate::consts::QUARTER_TURN_DEG;
use crate::error::OverlayError;
use crate::geometry::Point;

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

/// A rotation axis of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl FromStr for Axis {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(OverlayError::InvalidInput(format!("unknown axis {s:?}"))),
        }
    }
}

/// Independent per-axis rotations, in degrees. Not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    #[must_use]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, deg: f64) {
        match axis {
            Axis::X => self.x = deg,
            Axis::Y => self.y = deg,
            Axis::Z => self.z = deg,
        }
    }
}

/// Position, size, orientation and blending of the overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformState {
    /// Offset from the overlay's resting position, in CSS pixels.
    pub translation: Point,
    /// Uniform zoom factor; always > 0.
    pub scale: f64,
    pub rotation: Rotation,
    /// Horizontal flip, applied after rotation.
    pub mirrored: bool,
    /// Opacity in percent, 0–100.
    pub opacity: u8,
}

impl TransformState {
    /// A state at rest with the given opacity.
    #[must_use]
    pub fn with_opacity(opacity: u8) -> Self {
        Self {
            translation: Point::default(),
            scale: 1.0,
            rotation: Rotation::default(),
            mirrored: false,
            opacity: opacity.min(100),
        }
    }

    /// Return to rest: no offset, unit scale, no rotation, unmirrored.
    pub fn reset(&mut self, default_opacity: u8) {
        *self = Self::with_opacity(default_opacity);
    }

    /// Set opacity, clamped to 100.
    pub fn set_opacity(&mut self, percent: u8) {
        self.opacity = percent.min(100);
    }

    /// Add a quarter turn about Z, wrapping to zero once a full turn is reached.
    pub fn rotate_quarter_turn(&mut self) {
        self.rotation.z += QUARTER_TURN_DEG;
        if self.rotation.z >= 360.0 {
            self.rotation.z = 0.0;
        }
    }

    /// Opacity as an alpha multiplier in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        f64::from(self.opacity) / 100.0
    }

    /// CSS `transform` property value.
    #[must_use]
    pub fn css_transform(&self) -> String {
        let mut css = format!(
            "translate({}px, {}px) scale({}) rotateX({}deg) rotateY({}deg) rotateZ({}deg)",
            self.translation.x, self.translation.y, self.scale, self.rotation.x, self.rotation.y, self.rotation.z,
        );
        if self.mirrored {
            css.push_str(" scaleX(-1)");
        }
        css
    }

    /// CSS `opacity` property value.
    #[must_use]
    pub fn css_opacity(&self) -> String {
        format!("{}%", self.opacity)
    }

    /// The composed transform, applied left to right the way CSS applies a
    /// transform list.
    #[must_use]
    pub fn matrix(&self) -> DMat4 {
        let mut m = DMat4::from_translation(DVec3::new(self.translation.x, self.translation.y, 0.0))
            * DMat4::from_scale(DVec3::new(self.scale, self.scale, 1.0))
            * DMat4::from_rotation_x(self.rotation.x.to_radians())
            * DMat4::from_rotation_y(self.rotation.y.to_radians())
            * DMat4::from_rotation_z(self.rotation.z.to_radians());
        if self.mirrored {
            m *= DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0));
        }
        m
    }

    /// Orthographic projection of [`Self::matrix`] onto the screen plane, as
    /// the `[a, b, c, d, e, f]` arguments of a 2D canvas `setTransform`.
    #[must_use]
    pub fn affine_2d(&self) -> [f64; 6] {
        let m = self.matrix();
        [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, m.w_axis.x, m.w_axis.y]
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::with_opacity(crate::consts::DEFAULT_OPACITY)
    }
}

/// Non-geometric look of the overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverlayFilter {
    pub blurred: bool,
}

impl OverlayFilter {
    /// CSS `filter` property value for the given blur radius.
    #[must_use]
    pub fn css_filter(&self, blur_radius_px: f64) -> String {
        if self.blurred { format!("blur({blur_radius_px}px)") } else { "none".to_owned() }
    }
}

/// Appearance of the live camera feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraStyle {
    /// Brightness in percent; 100 is unchanged.
    pub brightness: u16,
}

impl Default for CameraStyle {
    fn default() -> Self {
        Self { brightness: crate::consts::DEFAULT_BRIGHTNESS }
    }
}

impl CameraStyle {
    /// CSS `filter` property value for the video element.
    #[must_use]
    pub fn css_filter(&self) -> String {
        format!("brightness({}%)", self.brightness)
    }
}
