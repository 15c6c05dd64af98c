//! A small vector-document browser engine.
//!
//! Documents are trees of shapes, text and text inputs fetched over HTTP,
//! parsed into a [`dom::Node`] tree and drawn every frame into a
//! device-agnostic [`render::RenderList`]. The [`engine`] layer adds the
//! per-frame hover/click machine, page loading, browser chrome with history,
//! and a DOM inspector.

pub mod config;
pub mod dom;
pub mod engine;
pub mod errors;
pub mod input;
pub mod net;
pub mod render;

pub use engine::*;
pub use errors::EngineError;
