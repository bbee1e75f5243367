//! # Sprite Batcher
//!
//! Collects textured quads for one frame and submits them with as few draw
//! calls as possible.
//!
//! ## Ordering
//!
//! Quads carry an integer depth. At render time they are stably sorted by
//! depth, so quads with equal depth keep the order they were added in.
//! Consecutive quads that share a texture and shader program are merged into
//! a single draw.
//!
//! ## Capacity
//!
//! The vertex buffer is sized once from a float budget; a frame can hold at
//! most `budget / FLOATS_PER_QUAD` quads. Quads beyond that are dropped and
//! reported.

use crate::foundation::math::{Mat4, Vec2, Vec4};
use crate::render::api::{GraphicsBackend, Program};
use crate::render::resources::TextureRef;
use crate::render::systems::atlas::PackedPixmap;
use crate::render::RenderError;

use super::vertex::{triangulate, QuadVerts, Vertex, FLOATS_PER_QUAD, VERTICES_PER_QUAD};

/// Default vertex buffer budget, in floats
pub const DEFAULT_VERTEX_BUFFER_FLOATS: usize = 0x10_0000;

/// Result type for batch rendering operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur during batch rendering
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Sprite added or batch rendered without a started batch
    #[error("No batch in progress")]
    NoActiveBatch,

    /// Too many quads for the vertex buffer
    #[error("Batch size limit exceeded: {max} quads")]
    CapacityExceeded {
        /// Maximum allowed quads
        max: usize,
    },

    /// Backend call failed
    #[error("Rendering error: {0}")]
    Backend(#[from] RenderError),
}

/// Statistics for batch rendering performance monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Quads submitted
    pub quad_count: usize,

    /// Draw calls issued
    pub draw_calls: usize,

    /// Program switches plus texture binds
    pub state_changes: usize,

    /// Quads rejected because the batch was full
    pub dropped_quads: usize,
}

impl BatchStats {
    /// Calculate average quads per draw call
    pub fn avg_quads_per_draw(&self) -> f32 {
        if self.draw_calls == 0 {
            0.0
        } else {
            self.quad_count as f32 / self.draw_calls as f32
        }
    }
}

/// A run of depth-sorted quads sharing texture and program
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRun {
    /// Texture bound for the run, if any
    pub texture: Option<TextureRef>,
    /// Program used for the run
    pub program: Program,
    /// Index of the first quad in sorted order
    pub first_quad: usize,
    /// Number of quads in the run
    pub quad_count: usize,
}

#[derive(Debug, Clone)]
struct BatchedQuad {
    texture: Option<TextureRef>,
    program: Program,
    verts: QuadVerts,
    depth: i32,
}

/// Depth-sorting, state-merging quad batcher
#[derive(Debug)]
pub struct SpriteBatcher {
    quads: Vec<BatchedQuad>,
    max_quads: usize,
    buffer_floats: usize,
    transform: Mat4,
    program: Program,
    batch_active: bool,
    buffer_allocated: bool,
    overflow_warned: bool,
    dropped_quads: usize,
}

impl Default for SpriteBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_VERTEX_BUFFER_FLOATS)
    }
}

impl SpriteBatcher {
    /// Create a batcher whose vertex buffer holds `buffer_floats` floats
    pub fn new(buffer_floats: usize) -> Self {
        let max_quads = buffer_floats / FLOATS_PER_QUAD;
        Self {
            quads: Vec::new(),
            max_quads,
            buffer_floats,
            transform: Mat4::identity(),
            program: Program::default(),
            batch_active: false,
            buffer_allocated: false,
            overflow_warned: false,
            dropped_quads: 0,
        }
    }

    /// Maximum quads per batch
    pub fn max_quads(&self) -> usize {
        self.max_quads
    }

    /// Quads added to the current batch
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// True between `start_batch` and `render_batch`
    pub fn is_batch_active(&self) -> bool {
        self.batch_active
    }

    /// Projection applied to every program
    pub fn set_transform_matrix(&mut self, matrix: Mat4) {
        self.transform = matrix;
    }

    /// Current projection
    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform
    }

    /// Program recorded with quads added from now on
    pub fn set_batch_program(&mut self, program: Program) {
        self.program = program;
    }

    /// Program recorded with newly added quads
    pub fn batch_program(&self) -> Program {
        self.program
    }

    /// Begin collecting quads for a frame
    pub fn start_batch(&mut self) {
        if self.batch_active {
            log::warn!(
                "Batch started while another was in progress; discarding {} quads",
                self.quads.len()
            );
        }
        self.quads.clear();
        self.batch_active = true;
        self.overflow_warned = false;
        self.dropped_quads = 0;
    }

    /// Add a quad drawn with `texture` (or no texture) at `depth`
    pub fn add_sprite(&mut self, texture: Option<TextureRef>, verts: QuadVerts, depth: i32) -> BatchResult<()> {
        if !self.batch_active {
            log::warn!("Sprite added outside of a batch");
            return Err(BatchError::NoActiveBatch);
        }
        if self.quads.len() >= self.max_quads {
            if !self.overflow_warned {
                log::warn!("Sprite batch full ({} quads); dropping sprites", self.max_quads);
                self.overflow_warned = true;
            }
            self.dropped_quads += 1;
            return Err(BatchError::CapacityExceeded { max: self.max_quads });
        }
        self.quads.push(BatchedQuad {
            texture,
            program: self.program,
            verts,
            depth,
        });
        Ok(())
    }

    /// Add an axis-aligned quad showing a packed pixmap
    pub fn add_pixmap_sprite(
        &mut self,
        pixmap: &PackedPixmap,
        top_left: Vec2,
        bottom_right: Vec2,
        fg_color: Vec4,
        bg_color: Vec4,
        depth: i32,
    ) -> BatchResult<()> {
        let (t0, t1) = (pixmap.texture_coords.min, pixmap.texture_coords.max);
        let verts = [
            Vertex::new(top_left, t0, fg_color, bg_color),
            Vertex::new(Vec2::new(bottom_right.x, top_left.y), Vec2::new(t1.x, t0.y), fg_color, bg_color),
            Vertex::new(bottom_right, t1, fg_color, bg_color),
            Vertex::new(Vec2::new(top_left.x, bottom_right.y), Vec2::new(t0.x, t1.y), fg_color, bg_color),
        ];
        self.add_sprite(Some(pixmap.texture.clone()), verts, depth)
    }

    /// Quad indices in draw order
    fn sorted_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.quads.len()).collect();
        order.sort_by_key(|&i| self.quads[i].depth);
        order
    }

    fn merge_runs(&self, order: &[usize]) -> Vec<DrawRun> {
        let mut runs: Vec<DrawRun> = Vec::new();
        for (position, &index) in order.iter().enumerate() {
            let quad = &self.quads[index];
            match runs.last_mut() {
                Some(run) if run.texture == quad.texture && run.program == quad.program => {
                    run.quad_count += 1;
                }
                _ => runs.push(DrawRun {
                    texture: quad.texture.clone(),
                    program: quad.program,
                    first_quad: position,
                    quad_count: 1,
                }),
            }
        }
        runs
    }

    /// Draw runs the current batch would be submitted as
    pub fn draw_runs(&self) -> Vec<DrawRun> {
        self.merge_runs(&self.sorted_order())
    }

    /// Allocate the backend vertex buffer once
    pub fn ensure_buffer_allocated(&mut self, backend: &mut dyn GraphicsBackend) -> BatchResult<()> {
        if !self.buffer_allocated {
            let size_bytes = self.buffer_floats * std::mem::size_of::<f32>();
            backend.allocate_vertex_buffer(size_bytes)?;
            log::debug!("Allocated {size_bytes} byte sprite vertex buffer");
            self.buffer_allocated = true;
        }
        Ok(())
    }

    /// Sort, merge and submit the current batch, then close it
    pub fn render_batch(&mut self, backend: &mut dyn GraphicsBackend) -> BatchResult<BatchStats> {
        if !self.batch_active {
            log::warn!("render_batch called without start_batch");
            return Ok(BatchStats::default());
        }
        self.batch_active = false;

        let mut stats = BatchStats {
            quad_count: self.quads.len(),
            dropped_quads: self.dropped_quads,
            ..BatchStats::default()
        };
        if self.dropped_quads > 0 {
            log::warn!("Dropped {} sprites this frame", self.dropped_quads);
        }
        if self.quads.is_empty() {
            return Ok(stats);
        }

        self.ensure_buffer_allocated(backend)?;

        let order = self.sorted_order();
        let runs = self.merge_runs(&order);

        let vertices: Vec<Vertex> = order
            .iter()
            .flat_map(|&i| triangulate(&self.quads[i].verts))
            .collect();
        backend.upload_vertices(bytemuck::cast_slice(&vertices))?;

        let mut current_program = None;
        let mut current_texture: Option<Option<&TextureRef>> = None;
        for run in &runs {
            if current_program != Some(run.program) {
                backend.use_program(run.program)?;
                backend.set_transform(&self.transform)?;
                current_program = Some(run.program);
                stats.state_changes += 1;
            }
            if current_texture != Some(run.texture.as_ref()) {
                match &run.texture {
                    Some(texture) => texture.bind(backend)?,
                    None => backend.bind_texture(None)?,
                }
                current_texture = Some(run.texture.as_ref());
                stats.state_changes += 1;
            }
            let first_vertex = run.first_quad * VERTICES_PER_QUAD;
            let vertex_count = run.quad_count * VERTICES_PER_QUAD;
            backend.draw_triangles(first_vertex as u32, vertex_count as u32)?;
            stats.draw_calls += 1;
        }

        log::trace!(
            "Rendered {} quads in {} draw calls ({:.1} quads/draw)",
            stats.quad_count,
            stats.draw_calls,
            stats.avg_quads_per_draw()
        );
        self.quads.clear();
        Ok(stats)
    }
}
