//! Public rendering API
//!
//! The backend contract the rest of the renderer is written against.

pub mod render_backend;

pub use render_backend::{GraphicsBackend, Program, TextureId};
