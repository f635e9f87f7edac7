//! Server error type.

use overlay::error::OverlayError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid {key}: {value:?}")]
    Env { key: &'static str, value: String },
    /// The overlay configuration derived from the environment is out of range.
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    /// Binding or serving failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
