//! Error type for the overlay crate.

use wasm_bindgen::JsValue;

/// Errors surfaced by the overlay engine.
///
/// Gesture handling itself is infallible; these cover user-supplied input and
/// the browser surface.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The selected file is not an image.
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
    /// The configuration JSON could not be parsed.
    #[error("invalid overlay config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    /// A configuration field is outside its allowed range.
    #[error("invalid overlay config: {field} {reason}")]
    ConfigValue { field: &'static str, reason: &'static str },
    /// A brush color string is not `#rgb` or `#rrggbb`.
    #[error("invalid brush color: {0}")]
    InvalidColor(String),
    /// A brush width is not a positive finite number.
    #[error("invalid brush width: {0}")]
    InvalidBrushWidth(f64),
    /// A snapshot's pixel buffer does not match its dimensions.
    #[error("malformed snapshot: expected {expected} bytes, found {actual}")]
    MalformedSnapshot { expected: usize, actual: usize },
    /// A value passed in from the host could not be decoded.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Engine output could not be encoded for the host.
    #[error("encode failed: {0}")]
    Encode(String),
    /// A browser canvas call failed.
    #[error("surface error: {0}")]
    Surface(String),
}

impl OverlayError {
    /// Wrap a JavaScript exception raised by a canvas call.
    #[must_use]
    pub fn from_js(err: &JsValue) -> Self {
        Self::Surface(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

impl From<OverlayError> for JsValue {
    fn from(err: OverlayError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
