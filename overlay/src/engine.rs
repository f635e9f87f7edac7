use log::{info, warn};
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::config::OverlayConfig;
use crate::draw::Drawing;
use crate::error::OverlayError;
use crate::gesture::{ContactEvent, GestureEffect, GestureRecognizer, GestureState, Tool};
use crate::render::{self, CanvasSurface};
use crate::surface::{Color, StrokeMode, StrokeStyle, Surface};
use crate::transform::{Axis, CameraStyle, OverlayFilter, TransformState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
///
/// Serialized for JavaScript as `{"type": "transform_changed", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// An overlay image was accepted; the host should show it.
    OverlayLoaded,
    /// The overlay transform changed; re-apply it to the overlay element.
    TransformChanged(TransformState),
    /// The overlay filter (blur) changed.
    FilterChanged(OverlayFilter),
    /// The camera feed's appearance changed.
    CameraStyleChanged(CameraStyle),
    /// Drawing surface pixels changed.
    SurfaceChanged,
    /// Whether the undo control should be enabled.
    UndoAvailable(bool),
}

/// Engine state and logic with no DOM dependency.
///
/// Generic over the drawing surface so it can be tested without WASM/browser
/// dependencies.
pub struct EngineCore<S: Surface> {
    pub config: OverlayConfig,
    pub transform: TransformState,
    pub filter: OverlayFilter,
    pub camera: CameraStyle,
    pub tool: Tool,
    overlay_loaded: bool,
    recognizer: GestureRecognizer,
    drawing: Drawing<S>,
}

impl<S: Surface> EngineCore<S> {
    /// Build an engine drawing on `surface`. The surface is wiped.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the surface cannot be cleared.
    pub fn new(surface: S, config: OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;
        let style = StrokeStyle {
            color: Color::parse(&config.brush_color)?,
            width: config.brush_width,
            mode: StrokeMode::Draw,
        };
        Ok(Self {
            transform: TransformState::with_opacity(config.default_opacity),
            filter: OverlayFilter::default(),
            camera: CameraStyle::default(),
            tool: Tool::default(),
            overlay_loaded: false,
            recognizer: GestureRecognizer::new(&config),
            drawing: Drawing::new(surface, style)?,
            config,
        })
    }

    // --- Overlay image ---

    /// Accept a newly imported file by MIME type and reset the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::UnsupportedFile`] for non-image files; state is
    /// left untouched.
    pub fn import_image(&mut self, mime: &str) -> Result<Vec<Action>, OverlayError> {
        if !mime.trim().to_ascii_lowercase().starts_with("image/") {
            warn!("import rejected: {mime}");
            return Err(OverlayError::UnsupportedFile(mime.to_owned()));
        }
        info!("overlay imported ({mime})");
        self.overlay_loaded = true;
        self.filter = OverlayFilter::default();
        let mut actions = vec![Action::OverlayLoaded, Action::FilterChanged(self.filter)];
        actions.extend(self.reset_transform());
        Ok(actions)
    }

    /// Return the overlay to rest with the configured default opacity.
    pub fn reset_transform(&mut self) -> Vec<Action> {
        self.transform.reset(self.config.default_opacity);
        self.transform_changed()
    }

    // --- Input ---

    /// Feed one pointer/touch event through the gesture recognizer.
    ///
    /// # Errors
    ///
    /// Propagates drawing surface failures.
    pub fn on_contacts(&mut self, event: &ContactEvent) -> Result<Vec<Action>, OverlayError> {
        let overlay = self.overlay_loaded.then_some(&mut self.transform);
        let effects = self.recognizer.handle(event, self.tool, overlay);

        let mut actions = Vec::new();
        for effect in effects {
            match effect {
                GestureEffect::Transformed => actions.push(Action::TransformChanged(self.transform)),
                GestureEffect::StrokeStarted(at) => self.drawing.begin_stroke(at),
                GestureEffect::StrokeMoved(to) => {
                    if self.drawing.stroke_to(to)? {
                        actions.push(Action::SurfaceChanged);
                    }
                }
                GestureEffect::StrokeEnded => {
                    if self.drawing.end_stroke()? {
                        actions.push(Action::UndoAvailable(self.drawing.can_undo()));
                    }
                }
            }
        }
        Ok(actions)
    }

    /// The pointer left the drawing surface: finish any stroke in progress.
    ///
    /// # Errors
    ///
    /// Propagates drawing surface failures.
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, OverlayError> {
        self.on_contacts(&ContactEvent::end(Vec::new()))
    }

    // --- Tools ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        match tool {
            Tool::Brush => self.drawing.set_mode(StrokeMode::Draw),
            Tool::Eraser => self.drawing.set_mode(StrokeMode::Erase),
            Tool::Move => {}
        }
    }

    /// Pick a brush color; also switches to the brush.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidColor`] for malformed colors.
    pub fn set_brush_color(&mut self, color: &str) -> Result<(), OverlayError> {
        self.drawing.set_color(Color::parse(color)?);
        self.set_tool(Tool::Brush);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidBrushWidth`] for non-positive widths.
    pub fn set_brush_width(&mut self, width: f64) -> Result<(), OverlayError> {
        self.drawing.set_width(width)
    }

    // --- Overlay controls ---

    pub fn set_rotation(&mut self, axis: Axis, deg: f64) -> Vec<Action> {
        self.transform.rotation.set(axis, deg);
        self.transform_changed()
    }

    pub fn reset_rotation(&mut self, axis: Axis) -> Vec<Action> {
        self.set_rotation(axis, 0.0)
    }

    pub fn rotate_quarter_turn(&mut self) -> Vec<Action> {
        self.transform.rotate_quarter_turn();
        self.transform_changed()
    }

    pub fn set_opacity(&mut self, percent: u8) -> Vec<Action> {
        self.transform.set_opacity(percent);
        self.transform_changed()
    }

    pub fn reset_opacity(&mut self) -> Vec<Action> {
        self.set_opacity(self.config.default_opacity)
    }

    pub fn toggle_mirror(&mut self) -> Vec<Action> {
        self.transform.mirrored = !self.transform.mirrored;
        self.transform_changed()
    }

    pub fn toggle_blur(&mut self) -> Vec<Action> {
        self.filter.blurred = !self.filter.blurred;
        vec![Action::FilterChanged(self.filter)]
    }

    // --- Camera ---

    pub fn set_brightness(&mut self, percent: u16) -> Vec<Action> {
        self.camera.brightness = percent;
        vec![Action::CameraStyleChanged(self.camera)]
    }

    pub fn reset_brightness(&mut self) -> Vec<Action> {
        self.set_brightness(CameraStyle::default().brightness)
    }

    // --- Drawing history ---

    /// # Errors
    ///
    /// Propagates drawing surface failures.
    pub fn undo(&mut self) -> Result<Vec<Action>, OverlayError> {
        self.drawing.undo()?;
        Ok(self.surface_changed())
    }

    /// # Errors
    ///
    /// Propagates drawing surface failures.
    pub fn clear(&mut self) -> Result<Vec<Action>, OverlayError> {
        info!("drawing cleared");
        self.drawing.clear()?;
        Ok(self.surface_changed())
    }

    /// Match the drawing surface to a new viewport size.
    ///
    /// # Errors
    ///
    /// Propagates drawing surface failures.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Vec<Action>, OverlayError> {
        self.drawing.resize(width, height)?;
        Ok(self.surface_changed())
    }

    // --- Queries ---

    #[must_use]
    pub fn overlay_loaded(&self) -> bool {
        self.overlay_loaded
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.drawing.can_undo()
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.recognizer.state()
    }

    #[must_use]
    pub fn drawing(&self) -> &Drawing<S> {
        &self.drawing
    }

    fn transform_changed(&self) -> Vec<Action> {
        vec![Action::TransformChanged(self.transform)]
    }

    fn surface_changed(&self) -> Vec<Action> {
        vec![Action::SurfaceChanged, Action::UndoAvailable(self.drawing.can_undo())]
    }
}

/// Encode actions as a JSON array for the host.
///
/// # Errors
///
/// Returns [`OverlayError::Encode`] if serialization fails.
pub fn actions_json(actions: &[Action]) -> Result<String, OverlayError> {
    serde_json::to_string(actions).map_err(|e| OverlayError::Encode(e.to_string()))
}

/// Download name for an exported drawing, from an ISO-8601 timestamp.
#[must_use]
pub fn export_file_name(iso_timestamp: &str) -> String {
    let date: String = iso_timestamp.chars().take(10).collect();
    format!("ar-drawing-{date}.png")
}

/// The full engine. Wraps `EngineCore` and owns the browser elements.
pub struct Engine {
    overlay: HtmlElement,
    video: HtmlElement,
    pub core: EngineCore<CanvasSurface>,
}

impl Engine {
    /// Bind to the drawing canvas, the overlay image element, and the camera video element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context or the config is invalid.
    pub fn new(
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        video: HtmlElement,
        config: OverlayConfig,
    ) -> Result<Self, JsValue> {
        let surface = CanvasSurface::new(canvas)?;
        let core = EngineCore::new(surface, config)?;
        Ok(Self { overlay, video, core })
    }

    /// Build from a JSON config document, as served by the app server.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the JSON is invalid or the canvas has no 2D context.
    pub fn from_config_json(
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        video: HtmlElement,
        config_json: &str,
    ) -> Result<Self, JsValue> {
        let config = OverlayConfig::from_json(config_json)?;
        Self::new(canvas, overlay, video, config)
    }

    // --- Delegated inputs ---

    /// # Errors
    ///
    /// Returns `Err` for non-image files.
    pub fn import_image(&mut self, mime: &str) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.import_image(mime)?)
    }

    pub fn reset_transform(&mut self) -> Vec<Action> {
        self.core.reset_transform()
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn on_contacts(&mut self, event: &ContactEvent) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.on_contacts(event)?)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.on_pointer_leave()?)
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    /// # Errors
    ///
    /// Returns `Err` for malformed colors.
    pub fn set_brush_color(&mut self, color: &str) -> Result<(), JsValue> {
        Ok(self.core.set_brush_color(color)?)
    }

    /// # Errors
    ///
    /// Returns `Err` for non-positive widths.
    pub fn set_brush_width(&mut self, width: f64) -> Result<(), JsValue> {
        Ok(self.core.set_brush_width(width)?)
    }

    pub fn set_rotation(&mut self, axis: Axis, deg: f64) -> Vec<Action> {
        self.core.set_rotation(axis, deg)
    }

    pub fn reset_rotation(&mut self, axis: Axis) -> Vec<Action> {
        self.core.reset_rotation(axis)
    }

    pub fn rotate_quarter_turn(&mut self) -> Vec<Action> {
        self.core.rotate_quarter_turn()
    }

    pub fn set_opacity(&mut self, percent: u8) -> Vec<Action> {
        self.core.set_opacity(percent)
    }

    pub fn reset_opacity(&mut self) -> Vec<Action> {
        self.core.reset_opacity()
    }

    pub fn toggle_mirror(&mut self) -> Vec<Action> {
        self.core.toggle_mirror()
    }

    pub fn toggle_blur(&mut self) -> Vec<Action> {
        self.core.toggle_blur()
    }

    pub fn set_brightness(&mut self, percent: u16) -> Vec<Action> {
        self.core.set_brightness(percent)
    }

    pub fn reset_brightness(&mut self) -> Vec<Action> {
        self.core.reset_brightness()
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn undo(&mut self) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.undo()?)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn clear(&mut self) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.clear()?)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Vec<Action>, JsValue> {
        Ok(self.core.resize(width, height)?)
    }

    // --- Render ---

    /// Apply the current overlay and camera styles to their elements.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a style property cannot be set.
    pub fn render(&self) -> Result<(), JsValue> {
        render::apply_overlay_style(
            &self.overlay,
            &self.core.transform,
            &self.core.filter,
            self.core.config.blur_radius_px,
            self.core.overlay_loaded(),
        )?;
        render::apply_camera_style(&self.video, &self.core.camera)
    }

    /// Flatten the overlay image and the drawing into a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the offscreen canvas cannot be created or drawn.
    pub fn export_png(&self, image: &HtmlImageElement) -> Result<String, JsValue> {
        let overlay = self.core.overlay_loaded().then_some(image);
        render::export_composite(self.core.drawing().surface(), overlay, &self.core.transform)
    }

    /// Download name for [`Self::export_png`], stamped with today's date.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        let now: String = js_sys::Date::new_0().to_iso_string().into();
        export_file_name(&now)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn transform(&self) -> TransformState {
        self.core.transform
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.can_undo()
    }
}
