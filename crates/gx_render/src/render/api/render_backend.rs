//! Backend abstraction traits for the rendering system
//!
//! This module defines the trait that graphics backends must implement so the
//! atlas, texture and batching layers can drive a GPU without knowing which
//! API sits underneath.

use crate::assets::{PixelFormat, Pixmap};
use crate::foundation::math::Mat4;
use crate::render::RenderResult;

slotmap::new_key_type! {
    /// Handle to a texture resource stored in the backend
    pub struct TextureId;
}

/// Shader programs used by the 2D renderer
///
/// The shader sources live with the backend; the renderer only selects one
/// per draw run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    /// Glyph quads sampling a coverage texture
    Text,
    /// Filled circles with an outline, also used for rounded rectangles
    Circle,
    /// Oriented line segments with per-end colors
    ThickLine,
    /// Circles with a soft glow falloff
    GlowCircle,
    /// Circular progress gauge
    CircleGauge,
    /// Textured quads (pixmaps)
    Decal,
}

impl Default for Program {
    fn default() -> Self {
        Self::Decal
    }
}

/// Main graphics backend trait
///
/// Calls arrive in submission order. A backend is free to defer work, but it
/// must observe every call in the order it was made.
pub trait GraphicsBackend {
    /// Create an empty texture and return an opaque handle
    fn create_texture(&mut self, width: u32, height: u32, format: PixelFormat) -> RenderResult<TextureId>;

    /// Replace the full contents of a texture
    fn upload_texture(&mut self, id: TextureId, pixmap: &Pixmap) -> RenderResult<()>;

    /// Bind a texture for subsequent draws, or unbind with `None`
    fn bind_texture(&mut self, id: Option<TextureId>) -> RenderResult<()>;

    /// Select the shader program for subsequent draws
    fn use_program(&mut self, program: Program) -> RenderResult<()>;

    /// Set the projection uniform of the active program
    fn set_transform(&mut self, matrix: &Mat4) -> RenderResult<()>;

    /// Allocate the streaming vertex buffer
    fn allocate_vertex_buffer(&mut self, size_bytes: usize) -> RenderResult<()>;

    /// Replace the vertex buffer contents starting at offset zero
    fn upload_vertices(&mut self, data: &[u8]) -> RenderResult<()>;

    /// Draw `vertex_count` vertices as a triangle list
    fn draw_triangles(&mut self, first_vertex: u32, vertex_count: u32) -> RenderResult<()>;
}
