//! # gx_render
//!
//! Core of a 2D UI renderer, independent of any particular GPU API.
//!
//! ## Features
//!
//! - **Texture Atlases**: Shelf-packed pages with deferred GPU upload
//! - **Glyph Cache**: Lazily rasterized glyphs packed into a shared atlas
//! - **Sprite Batching**: Depth-ordered quads merged into few draw calls
//! - **Painter**: Text layout, shapes and pixmaps behind a frame bracket
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gx_render::prelude::*;
//!
//! let assets = DirectoryAssets::new("assets");
//! let mut painter = Painter::new(RecordingBackend::new(), Box::new(assets), PainterConfig::default());
//! painter.resize(1920, 1080);
//!
//! painter.start_painting();
//! painter.set_font(Font::new("DejaVuSans.ttf", 24));
//! painter.draw_text(Vec2::new(-600.0, -300.0), Vec4::repeat(1.0), 0, "Hello".chars());
//! let stats = painter.done_painting().expect("frame submission");
//! println!("{} quads in {} draw calls", stats.quad_count, stats.draw_calls);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        assets::{DirectoryAssets, MemoryAssets, PixelFormat, Pixmap, ResourceLoader},
        config::{Config, PainterConfig},
        foundation::math::{BoxF, BoxI, Mat4, Vec2, Vec4},
        render::{
            BatchStats, Font, GraphicsBackend, HorizontalAlign, PackedPixmap, Painter, Program,
            RecordingBackend, RenderError, RenderResult, TextureAtlas, VerticalAlign,
        },
    };
}
