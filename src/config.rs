//! Server configuration from the environment.
//!
//! Every variable is optional:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PORT` | `3000` | Listen port |
//! | `STATIC_DIR` | `dist` | Built web app to serve at `/` |
//! | `DEFAULT_OPACITY` | `100` | Overlay opacity (percent) on import |

use std::path::PathBuf;
use std::str::FromStr;

use overlay::config::OverlayConfig;

use crate::error::ServerError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "dist";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Published to the browser at `/api/overlay-config`.
    pub overlay: OverlayConfig,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns [`ServerError`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Env`] for unparsable values and
    /// [`ServerError::Overlay`] for out-of-range overlay settings.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let mut overlay = OverlayConfig::default();
        overlay.default_opacity = parse_var(&lookup, "DEFAULT_OPACITY", overlay.default_opacity)?;
        overlay.validate()?;

        Ok(Self {
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            static_dir: lookup("STATIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            overlay,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ServerError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ServerError::Env { key, value }),
    }
}
