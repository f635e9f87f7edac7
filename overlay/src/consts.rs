//! Shared numeric constants for the overlay crate.

// ── Gestures ────────────────────────────────────────────────────

/// Two-finger rotation below this many degrees is treated as jitter.
pub const ROTATE_THRESHOLD_DEG: f64 = 5.0;

/// Fraction of the raw finger rotation applied to the overlay.
pub const ROTATE_DAMPING: f64 = 0.5;

/// Finger separations at or below this are too small to use as a pinch baseline.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1e-6;

/// Smallest overlay scale a pinch may produce.
pub const MIN_SCALE: f64 = 0.05;

// ── Overlay ─────────────────────────────────────────────────────

/// Default overlay opacity, in percent.
pub const DEFAULT_OPACITY: u8 = 100;

/// Step applied by the quarter-turn control, in degrees.
pub const QUARTER_TURN_DEG: f64 = 90.0;

/// Blur radius of the overlay blur filter, in CSS pixels.
pub const BLUR_RADIUS_PX: f64 = 5.0;

/// Neutral camera brightness, in percent.
pub const DEFAULT_BRIGHTNESS: u16 = 100;

// ── Drawing ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained by the undo history.
pub const HISTORY_CAPACITY: usize = 20;

/// Default brush color.
pub const DEFAULT_BRUSH_COLOR: &str = "#000000";

/// Default brush width, in CSS pixels.
pub const DEFAULT_BRUSH_WIDTH: f64 = 5.0;
