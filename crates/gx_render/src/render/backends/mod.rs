//! Backend implementations for the render module
//!
//! Only a headless recorder ships with the crate; GPU backends implement
//! [`GraphicsBackend`](crate::render::api::GraphicsBackend) downstream.

/// Headless backend that records every call
pub mod recording;

pub use recording::{BackendCommand, RecordingBackend};
