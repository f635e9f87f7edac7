//! Freehand drawing layer with undo.
//!
//! [`Drawing`] owns the raster surface and its [`History`]; nothing else
//! mutates either. A snapshot is recorded when a stroke ends, after a clear,
//! and after a resize. The frame shown before a stroke is always the previous
//! snapshot, so one undo removes one stroke.

use log::{debug, info};

use crate::error::OverlayError;
use crate::geometry::Point;
use crate::history::History;
use crate::surface::{Color, Snapshot, StrokeMode, StrokeStyle, Surface};

#[cfg(test)]
#[path = "draw_test.rs"]
mod draw_test;

pub struct Drawing<S: Surface> {
    surface: S,
    history: History<Snapshot>,
    style: StrokeStyle,
    /// Last point of the stroke in progress.
    stroke: Option<Point>,
}

impl<S: Surface> Drawing<S> {
    /// Take ownership of `surface`, wipe it, and record the blank frame.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn new(surface: S, style: StrokeStyle) -> Result<Self, OverlayError> {
        let mut drawing = Self { surface, history: History::new(), style, stroke: None };
        drawing.clear()?;
        Ok(drawing)
    }

    // --- Strokes ---

    /// Start a stroke at `at`. Any stroke already in progress is dropped
    /// without recording.
    pub fn begin_stroke(&mut self, at: Point) {
        self.stroke = Some(at);
    }

    /// Extend the active stroke to `to`. Returns `false` when no stroke is active.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn stroke_to(&mut self, to: Point) -> Result<bool, OverlayError> {
        let Some(from) = self.stroke else {
            return Ok(false);
        };
        self.surface.stroke_segment(from, to, &self.style)?;
        self.stroke = Some(to);
        Ok(true)
    }

    /// Finish the active stroke and record it. Returns `false` when no stroke was active.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn end_stroke(&mut self) -> Result<bool, OverlayError> {
        if self.stroke.take().is_none() {
            return Ok(false);
        }
        self.record()?;
        Ok(true)
    }

    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    // --- History ---

    /// Restore the previous frame, or clear the surface when already at the
    /// oldest one.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn undo(&mut self) -> Result<(), OverlayError> {
        self.stroke = None;
        let restored = match self.history.undo() {
            Some(frame) => {
                self.surface.restore(frame)?;
                true
            }
            None => false,
        };
        if restored {
            debug!("undo: restored frame {:?}", self.history.cursor());
            Ok(())
        } else {
            info!("undo: at oldest frame, clearing");
            self.clear()
        }
    }

    /// Wipe the surface and record the empty frame, so the clear itself can be undone.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn clear(&mut self) -> Result<(), OverlayError> {
        self.stroke = None;
        self.surface.clear()?;
        self.record()
    }

    /// Replace the surface with a blank one of the new size and record it.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), OverlayError> {
        self.stroke = None;
        self.surface.resize(width, height)?;
        self.record()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    fn record(&mut self) -> Result<(), OverlayError> {
        let snapshot = self.surface.snapshot()?;
        self.history.push(snapshot);
        Ok(())
    }

    // --- Style ---

    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_mode(&mut self, mode: StrokeMode) {
        self.style.mode = mode;
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidBrushWidth`] for non-positive widths.
    pub fn set_width(&mut self, width: f64) -> Result<(), OverlayError> {
        self.style.set_width(width)
    }

    // --- Surface ---

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
