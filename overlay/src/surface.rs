//! Raster surfaces the drawing engine paints on.
//!
//! [`Surface`] is the seam between stroke logic and pixels. [`Raster`] is an
//! in-memory RGBA buffer used off-browser and in tests; the browser canvas
//! implementation lives in [`crate::render`].

use crate::error::OverlayError;
use crate::geometry::{Point, distance_to_segment};

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parse `#rrggbb` or `#rgb`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidColor`] for anything else.
    pub fn parse(s: &str) -> Result<Self, OverlayError> {
        let invalid = || OverlayError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self { r: channel(&hex[0..2])?, g: channel(&hex[2..4])?, b: channel(&hex[4..6])? }),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self { r: short(0)?, g: short(1)?, b: short(2)? })
            }
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb` form for canvas style strings.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    #[must_use]
    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Whether a stroke paints or erases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeMode {
    /// Paint the stroke color over existing pixels.
    #[default]
    Draw,
    /// Clear covered pixels to full transparency.
    Erase,
}

/// How strokes are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in CSS pixels; always > 0.
    pub width: f64,
    pub mode: StrokeMode,
}

impl StrokeStyle {
    /// Replace the width, rejecting non-positive or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidBrushWidth`].
    pub fn set_width(&mut self, width: f64) -> Result<(), OverlayError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(OverlayError::InvalidBrushWidth(width));
        }
        self.width = width;
        Ok(())
    }
}

/// A full RGBA capture of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl Snapshot {
    /// A fully transparent snapshot.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; pixel_len(width, height)] }
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }
}

/// A fixed-size raster the drawing engine can stroke, wipe, capture and restore.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Render a round-capped segment from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing surface rejects the draw call.
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> Result<(), OverlayError>;

    /// Wipe every pixel to full transparency.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing surface rejects the call.
    fn clear(&mut self) -> Result<(), OverlayError>;

    /// Capture the current pixels.
    ///
    /// # Errors
    ///
    /// Returns an error when the pixels cannot be read back.
    fn snapshot(&self) -> Result<Snapshot, OverlayError>;

    /// Wipe the surface, then copy the capture in at the origin. A capture
    /// from a differently sized surface is clipped to the overlap.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::MalformedSnapshot`] when the pixel buffer does
    /// not match the capture's own dimensions.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), OverlayError>;

    /// Replace the surface with a blank one of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing surface cannot be resized.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), OverlayError>;
}

/// In-memory RGBA surface.
///
/// A pixel is covered by a stroke when its center lies within half the stroke
/// width of the segment, which yields round caps and joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; pixel_len(width, height)] }
    }

    /// RGBA value at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl Surface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> Result<(), OverlayError> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let radius = style.width / 2.0;
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        let x0 = (from.x.min(to.x) - radius).floor().clamp(0.0, max_x) as u32;
        let x1 = (from.x.max(to.x) + radius).ceil().clamp(0.0, max_x) as u32;
        let y0 = (from.y.min(to.y) - radius).floor().clamp(0.0, max_y) as u32;
        let y1 = (from.y.max(to.y) + radius).ceil().clamp(0.0, max_y) as u32;

        let value = match style.mode {
            StrokeMode::Draw => style.color.rgba(),
            StrokeMode::Erase => [0, 0, 0, 0],
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    let i = self.index(x, y);
                    self.pixels[i..i + 4].copy_from_slice(&value);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), OverlayError> {
        self.pixels.fill(0);
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, OverlayError> {
        Ok(Snapshot { width: self.width, height: self.height, pixels: self.pixels.clone() })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), OverlayError> {
        check_len(snapshot)?;
        self.pixels.fill(0);
        let row_bytes = self.width.min(snapshot.width) as usize * 4;
        for y in 0..self.height.min(snapshot.height) as usize {
            let dst = y * self.width as usize * 4;
            let src = y * snapshot.width as usize * 4;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&snapshot.pixels[src..src + row_bytes]);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), OverlayError> {
        *self = Self::new(width, height);
        Ok(())
    }
}

/// Reject a snapshot whose buffer length disagrees with its dimensions.
pub(crate) fn check_len(snapshot: &Snapshot) -> Result<(), OverlayError> {
    let expected = pixel_len(snapshot.width, snapshot.height);
    if snapshot.pixels.len() != expected {
        return Err(OverlayError::MalformedSnapshot { expected, actual: snapshot.pixels.len() });
    }
    Ok(())
}

fn pixel_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}
