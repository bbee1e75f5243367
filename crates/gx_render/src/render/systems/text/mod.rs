//! Text rendering system
//!
//! Glyph caching and paragraph layout.

pub mod font_cache;
pub mod layout;

pub use font_cache::*;
pub use layout::*;
