//! Batched vertex layout

// Pod/Zeroable derives expand to unsafe impls
#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Vec2, Vec4};

/// Vertex streamed to the GPU for every sprite corner
///
/// `aux` carries per-program parameters (inner radius fraction, gauge
/// angles, line thickness) that the shaders interpret.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position after the painter transform
    pub position: [f32; 2],
    /// Texture coordinates (or shape-local coordinates for untextured programs)
    pub tex_coords: [f32; 2],
    /// Foreground color
    pub fg_color: [f32; 4],
    /// Background color
    pub bg_color: [f32; 4],
    /// Program-specific parameters
    pub aux: [f32; 4],
}

/// Floats in one vertex
pub const FLOATS_PER_VERTEX: usize = std::mem::size_of::<Vertex>() / std::mem::size_of::<f32>();

/// Vertices emitted per quad (two triangles)
pub const VERTICES_PER_QUAD: usize = 6;

/// Floats consumed by one quad in the vertex buffer
pub const FLOATS_PER_QUAD: usize = VERTICES_PER_QUAD * FLOATS_PER_VERTEX;

/// Four corners of a sprite, in winding order
pub type QuadVerts = [Vertex; 4];

impl Vertex {
    /// Vertex with colors and no auxiliary parameters
    pub fn new(position: Vec2, tex_coords: Vec2, fg_color: Vec4, bg_color: Vec4) -> Self {
        Self {
            position: position.into(),
            tex_coords: tex_coords.into(),
            fg_color: fg_color.into(),
            bg_color: bg_color.into(),
            aux: [0.0; 4],
        }
    }

    /// Replace the auxiliary parameters
    #[must_use]
    pub fn with_aux(mut self, aux: Vec4) -> Self {
        self.aux = aux.into();
        self
    }
}

/// Split a quad into the two triangles `(v0, v1, v2)` and `(v2, v3, v0)`
pub fn triangulate(quad: &QuadVerts) -> [Vertex; VERTICES_PER_QUAD] {
    [quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]
}
