//! Tracing overlay engine for the camera drawing aid.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A reference
//! image is laid over the live camera feed so the user can trace it onto paper;
//! a transparent drawing layer sits above both. The engine turns raw contact
//! events into overlay transforms (pan, pinch-zoom, rotate) and brush strokes,
//! keeps a bounded undo history of the drawing, and renders everything back to
//! the DOM. The page script constructs [`bindings::OverlayApp`], wires DOM
//! events to it, and acts on the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`bindings`] | `#[wasm_bindgen]` entry points for the page script |
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`gesture`] | Contact events, tools, and the gesture state machine |
//! | [`transform`] | Overlay transform state and its CSS/matrix forms |
//! | [`draw`] | Drawing layer: strokes, clear, undo |
//! | [`history`] | Bounded undo history |
//! | [`surface`] | Raster surface trait and in-memory implementation |
//! | [`render`] | Canvas surface, element styles, PNG export |
//! | [`geometry`] | Points, distances, angles |
//! | [`config`] | Tunable settings loaded from JSON |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared numeric defaults |

pub mod bindings;
pub mod config;
pub mod consts;
pub mod draw;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod render;
pub mod surface;
pub mod transform;
