//! Router assembly.
//!
//! The built web app (HTML, JS glue, and the overlay wasm) is served as static
//! files at `/`. The only dynamic endpoint publishes the overlay configuration
//! so the host page can hand it to the engine at startup.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use overlay::config::OverlayConfig;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub fn app(config: &ServerConfig) -> Router {
    let static_files = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/overlay-config", get(overlay_config))
        .route("/healthz", get(healthz))
        .with_state(Arc::new(config.overlay.clone()))
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// `GET /api/overlay-config`
pub async fn overlay_config(State(config): State<Arc<OverlayConfig>>) -> Json<OverlayConfig> {
    Json(OverlayConfig::clone(&config))
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
