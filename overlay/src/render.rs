//! Browser rendering: the canvas drawing surface, element styles, and export.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`]
//! or element styles. It reads engine state and produces pixels; it does not
//! decide anything.
//!
//! All fallible DOM calls propagate errors via `Result<_, JsValue>`, or
//! [`OverlayError::Surface`] behind the [`Surface`] trait.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement, ImageData};

use crate::error::OverlayError;
use crate::geometry::Point;
use crate::surface::{Snapshot, StrokeMode, StrokeStyle, Surface, check_len};
use crate::transform::{CameraStyle, OverlayFilter, TransformState};

/// The drawing layer canvas.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let surface = Self { canvas, ctx };
        surface.apply_line_style();
        Ok(surface)
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // Resizing a canvas resets its context state.
    fn apply_line_style(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> Result<(), OverlayError> {
        let op = match style.mode {
            StrokeMode::Draw => "source-over",
            StrokeMode::Erase => "destination-out",
        };
        self.ctx.set_global_composite_operation(op).map_err(|e| OverlayError::from_js(&e))?;
        // Erasing removes alpha, so the stroke must be opaque.
        self.ctx.set_stroke_style_str(&style.color.to_hex());
        self.ctx.set_line_width(style.width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        self.ctx.set_global_composite_operation("source-over").map_err(|e| OverlayError::from_js(&e))
    }

    fn clear(&mut self) -> Result<(), OverlayError> {
        self.ctx.clear_rect(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, OverlayError> {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return Ok(Snapshot::blank(width, height));
        }
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(|e| OverlayError::from_js(&e))?;
        Ok(Snapshot { width, height, pixels: data.data().0 })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), OverlayError> {
        check_len(snapshot)?;
        self.clear()?;
        if snapshot.width == 0 || snapshot.height == 0 {
            return Ok(());
        }
        let data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(snapshot.pixels.as_slice()), snapshot.width, snapshot.height)
                .map_err(|e| OverlayError::from_js(&e))?;
        self.ctx.put_image_data(&data, 0.0, 0.0).map_err(|e| OverlayError::from_js(&e))
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), OverlayError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.apply_line_style();
        Ok(())
    }
}

// =============================================================
// Element styles
// =============================================================

/// Push the overlay transform, opacity, filter and visibility onto its element.
///
/// # Errors
///
/// Returns `Err` if a style property is rejected.
pub fn apply_overlay_style(
    el: &HtmlElement,
    transform: &TransformState,
    filter: &OverlayFilter,
    blur_radius_px: f64,
    visible: bool,
) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("display", if visible { "block" } else { "none" })?;
    style.set_property("transform", &transform.css_transform())?;
    style.set_property("opacity", &transform.css_opacity())?;
    style.set_property("filter", &filter.css_filter(blur_radius_px))
}

/// # Errors
///
/// Returns `Err` if the style property is rejected.
pub fn apply_camera_style(el: &HtmlElement, camera: &CameraStyle) -> Result<(), JsValue> {
    el.style().set_property("filter", &camera.css_filter())
}

// =============================================================
// Export
// =============================================================

/// Flatten the overlay (when given) under the drawing layer and encode a PNG
/// data URL. The camera feed is not included.
///
/// # Errors
///
/// Returns `Err` if the offscreen canvas cannot be created, drawn or encoded.
pub fn export_composite(
    drawing: &CanvasSurface,
    overlay: Option<&HtmlImageElement>,
    transform: &TransformState,
) -> Result<String, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let out: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    out.set_width(drawing.width());
    out.set_height(drawing.height());
    let ctx = context_2d(&out)?;

    if let Some(image) = overlay {
        let [a, b, c, d, e, f] = transform.affine_2d();
        let w = f64::from(image.natural_width());
        let h = f64::from(image.natural_height());
        ctx.save();
        ctx.translate(f64::from(out.width()) / 2.0, f64::from(out.height()) / 2.0)?;
        ctx.transform(a, b, c, d, e, f)?;
        ctx.set_global_alpha(transform.alpha());
        ctx.draw_image_with_html_image_element_and_dw_and_dh(image, -w / 2.0, -h / 2.0, w, h)?;
        ctx.restore();
    }

    ctx.draw_image_with_html_canvas_element(drawing.canvas(), 0.0, 0.0)?;
    out.to_data_url_with_type("image/png")
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}
