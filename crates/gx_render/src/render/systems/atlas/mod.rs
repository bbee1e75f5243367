//! Texture atlases
//!
//! Small pixmaps (glyphs, icons) are packed into large shared textures so a
//! frame can draw many of them without switching textures.

pub mod page;
pub mod texture_atlas;

pub use page::AtlasPage;
pub use texture_atlas::{AtlasError, AtlasResult, PackedPixmap, TextureAtlas};
