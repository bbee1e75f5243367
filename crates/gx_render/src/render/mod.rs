//! # Rendering System
//!
//! 2D UI rendering layered over an abstract graphics backend.
//!
//! ## Architecture
//!
//! - **api**: The [`GraphicsBackend`] contract, texture ids and shader programs
//! - **backends**: Backend implementations (a headless recorder)
//! - **resources**: Textures that can be bound during a draw
//! - **systems**: Atlases, glyph caching, sprite batching and the UI painter
//!
//! The GPU itself stays behind the backend trait; nothing in this module owns
//! a device, a window or shader sources.

pub mod api;
pub mod backends;
pub mod resources;
pub mod systems;

pub use api::{GraphicsBackend, Program, TextureId};
pub use backends::{BackendCommand, RecordingBackend};
pub use resources::{EagerTexture, LazyTexture, Texture, TextureRef};
pub use systems::atlas::{AtlasError, AtlasPage, PackedPixmap, TextureAtlas};
pub use systems::batching::{BatchError, BatchResult, BatchStats, SpriteBatcher, Vertex};
pub use systems::text::{FontCache, FontError, Glyph, HorizontalAlign, TextRow, VerticalAlign};
pub use systems::ui::{Font, Painter};

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A rendering operation failed during execution
    ///
    /// Covers failed uploads, binds and draw submissions.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    ///
    /// Occurs when GPU resources (buffers, textures) cannot be created,
    /// typically due to memory constraints or invalid data.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A handle was used that the backend does not know about
    #[error("Unknown texture: {0:?}")]
    UnknownTexture(TextureId),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
