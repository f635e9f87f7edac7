//! JavaScript entry points.
//!
//! [`OverlayApp`] is what the page script constructs. It takes only values
//! that cross the wasm boundary directly: DOM elements, strings, numbers and
//! flat `Float64Array`s of contacts (see [`crate::gesture::CONTACT_STRIDE`]).
//! Every mutating call re-applies element styles and returns the resulting
//! [`Action`]s as a JSON array string.

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::engine::{Action, Engine, actions_json};
use crate::gesture::{ContactEvent, Phase, Tool};
use crate::transform::Axis;

#[wasm_bindgen]
pub struct OverlayApp {
    engine: Engine,
}

#[wasm_bindgen]
impl OverlayApp {
    /// `config_json` is the body of `GET /api/overlay-config`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the config is invalid or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        video: HtmlElement,
        config_json: &str,
    ) -> Result<OverlayApp, JsValue> {
        let engine = Engine::from_config_json(canvas, overlay, video, config_json)?;
        engine.render()?;
        Ok(Self { engine })
    }

    // --- Input ---

    /// `phase` is `start`, `move` or `end`; `contacts` packs every contact
    /// still active as `id, x, y, on_control`.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a malformed event or a canvas failure.
    #[wasm_bindgen(js_name = onContacts)]
    pub fn on_contacts(&mut self, phase: &str, contacts: &[f64]) -> Result<String, JsValue> {
        let event = ContactEvent::from_flat(phase.parse::<Phase>()?, contacts)?;
        let actions = self.engine.on_contacts(&event)?;
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    #[wasm_bindgen(js_name = onPointerLeave)]
    pub fn on_pointer_leave(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.on_pointer_leave()?;
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` for non-image files; nothing changes.
    #[wasm_bindgen(js_name = importImage)]
    pub fn import_image(&mut self, mime: &str) -> Result<String, JsValue> {
        let actions = self.engine.import_image(mime)?;
        self.finish(&actions)
    }

    // --- Tools ---

    /// # Errors
    ///
    /// Returns `Err` unless `tool` is `move`, `brush` or `eraser`.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        self.engine.set_tool(tool.parse::<Tool>()?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Err` for malformed colors.
    #[wasm_bindgen(js_name = setBrushColor)]
    pub fn set_brush_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.engine.set_brush_color(color)
    }

    /// # Errors
    ///
    /// Returns `Err` for non-positive widths.
    #[wasm_bindgen(js_name = setBrushWidth)]
    pub fn set_brush_width(&mut self, width: f64) -> Result<(), JsValue> {
        self.engine.set_brush_width(width)
    }

    // --- Overlay controls ---

    /// # Errors
    ///
    /// Returns `Err` unless `axis` is `x`, `y` or `z`.
    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, axis: &str, deg: f64) -> Result<String, JsValue> {
        let actions = self.engine.set_rotation(axis.parse::<Axis>()?, deg);
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` unless `axis` is `x`, `y` or `z`.
    #[wasm_bindgen(js_name = resetRotation)]
    pub fn reset_rotation(&mut self, axis: &str) -> Result<String, JsValue> {
        let actions = self.engine.reset_rotation(axis.parse::<Axis>()?);
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = rotateQuarterTurn)]
    pub fn rotate_quarter_turn(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.rotate_quarter_turn();
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = setOpacity)]
    pub fn set_opacity(&mut self, percent: u8) -> Result<String, JsValue> {
        let actions = self.engine.set_opacity(percent);
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = resetOpacity)]
    pub fn reset_opacity(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.reset_opacity();
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = resetTransform)]
    pub fn reset_transform(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.reset_transform();
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = toggleMirror)]
    pub fn toggle_mirror(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.toggle_mirror();
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = toggleBlur)]
    pub fn toggle_blur(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.toggle_blur();
        self.finish(&actions)
    }

    // --- Camera ---

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = setBrightness)]
    pub fn set_brightness(&mut self, percent: u16) -> Result<String, JsValue> {
        let actions = self.engine.set_brightness(percent);
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a style property is rejected.
    #[wasm_bindgen(js_name = resetBrightness)]
    pub fn reset_brightness(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.reset_brightness();
        self.finish(&actions)
    }

    // --- Drawing history ---

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn undo(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.undo()?;
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn clear(&mut self) -> Result<String, JsValue> {
        let actions = self.engine.clear()?;
        self.finish(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        let actions = self.engine.resize(width, height)?;
        self.finish(&actions)
    }

    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    // --- Export ---

    /// # Errors
    ///
    /// Returns `Err` if the composite cannot be drawn or encoded.
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self, image: &HtmlImageElement) -> Result<String, JsValue> {
        self.engine.export_png(image)
    }

    #[wasm_bindgen(js_name = exportFileName)]
    #[must_use]
    pub fn export_file_name(&self) -> String {
        self.engine.export_file_name()
    }
}

impl OverlayApp {
    fn finish(&self, actions: &[Action]) -> Result<String, JsValue> {
        self.engine.render()?;
        Ok(actions_json(actions)?)
    }
}
