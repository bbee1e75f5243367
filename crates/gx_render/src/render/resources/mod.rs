//! Rendering resources

pub mod texture;

pub use texture::{EagerTexture, LazyTexture, Texture, TextureRef};
