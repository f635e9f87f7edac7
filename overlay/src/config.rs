//! Tunable overlay settings.
//!
//! Product variants disagree on some defaults (the overlay opens fully opaque
//! in one, half transparent in another), so they live here rather than in the
//! engine. The host fetches this as JSON and hands it to the engine at startup.

use serde::{Deserialize, Serialize};

use crate::consts::{
    BLUR_RADIUS_PX, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_WIDTH, DEFAULT_OPACITY, MIN_SCALE, ROTATE_DAMPING,
    ROTATE_THRESHOLD_DEG,
};
use crate::error::OverlayError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Engine configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Opacity (percent) applied on import and by the opacity reset control.
    pub default_opacity: u8,
    /// Minimum two-finger angle change, in degrees, before rotation applies.
    pub rotate_threshold_deg: f64,
    /// Fraction of the finger rotation applied to the overlay.
    pub rotate_damping: f64,
    /// Lower bound on the overlay scale.
    pub min_scale: f64,
    /// Radius of the overlay blur filter, in CSS pixels.
    pub blur_radius_px: f64,
    /// Initial brush color (`#rgb` or `#rrggbb`).
    pub brush_color: String,
    /// Initial brush width, in CSS pixels.
    pub brush_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_opacity: DEFAULT_OPACITY,
            rotate_threshold_deg: ROTATE_THRESHOLD_DEG,
            rotate_damping: ROTATE_DAMPING,
            min_scale: MIN_SCALE,
            blur_radius_px: BLUR_RADIUS_PX,
            brush_color: DEFAULT_BRUSH_COLOR.to_owned(),
            brush_width: DEFAULT_BRUSH_WIDTH,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ConfigParse`] for malformed JSON and
    /// [`OverlayError::ConfigValue`] for out-of-range fields.
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is within range.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ConfigValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.default_opacity > 100 {
            return Err(OverlayError::ConfigValue { field: "default_opacity", reason: "must be 0-100" });
        }
        if !self.rotate_threshold_deg.is_finite() || self.rotate_threshold_deg < 0.0 {
            return Err(OverlayError::ConfigValue { field: "rotate_threshold_deg", reason: "must be >= 0" });
        }
        if !self.rotate_damping.is_finite() || self.rotate_damping < 0.0 {
            return Err(OverlayError::ConfigValue { field: "rotate_damping", reason: "must be >= 0" });
        }
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(OverlayError::ConfigValue { field: "min_scale", reason: "must be > 0" });
        }
        if !self.blur_radius_px.is_finite() || self.blur_radius_px < 0.0 {
            return Err(OverlayError::ConfigValue { field: "blur_radius_px", reason: "must be >= 0" });
        }
        if !self.brush_width.is_finite() || self.brush_width <= 0.0 {
            return Err(OverlayError::ConfigValue { field: "brush_width", reason: "must be > 0" });
        }
        crate::surface::Color::parse(&self.brush_color)?;
        Ok(())
    }
}
