//! Headless recording backend
//!
//! Implements [`GraphicsBackend`] without a GPU. Every call is validated the
//! way a real driver would reject it and appended to a command log that tests
//! and tools can inspect afterwards.

use slotmap::SlotMap;

use crate::assets::{PixelFormat, Pixmap};
use crate::foundation::math::Mat4;
use crate::render::api::{GraphicsBackend, Program, TextureId};
use crate::render::systems::batching::Vertex;
use crate::render::{RenderError, RenderResult};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// A texture was created
    CreateTexture {
        /// New texture handle
        id: TextureId,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Pixel format
        format: PixelFormat,
    },
    /// Texture contents were replaced
    UploadTexture(TextureId),
    /// A texture was bound, or textures were unbound
    BindTexture(Option<TextureId>),
    /// A shader program was selected
    UseProgram(Program),
    /// The projection uniform was set
    SetTransform(Mat4),
    /// The vertex buffer was allocated
    AllocateVertexBuffer(usize),
    /// Vertex data was uploaded (byte count)
    UploadVertices(usize),
    /// A triangle list was drawn
    DrawTriangles {
        /// First vertex index
        first_vertex: u32,
        /// Number of vertices
        vertex_count: u32,
    },
}

#[derive(Debug)]
struct RecordedTexture {
    width: u32,
    height: u32,
    format: PixelFormat,
    contents: Option<Pixmap>,
    uploads: usize,
}

/// Backend that records calls instead of talking to a GPU
#[derive(Debug, Default)]
pub struct RecordingBackend {
    textures: SlotMap<TextureId, RecordedTexture>,
    commands: Vec<BackendCommand>,
    vertex_buffer_size: Option<usize>,
    vertex_data: Vec<u8>,
    bound_texture: Option<TextureId>,
    program: Option<Program>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls recorded so far
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Drain the command log, keeping textures and buffers alive
    pub fn take_commands(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of textures created
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of uploads a texture received
    pub fn texture_uploads(&self, id: TextureId) -> usize {
        self.textures.get(id).map_or(0, |t| t.uploads)
    }

    /// Last uploaded contents of a texture
    pub fn texture_contents(&self, id: TextureId) -> Option<&Pixmap> {
        self.textures.get(id).and_then(|t| t.contents.as_ref())
    }

    /// Size of the vertex buffer in bytes, if allocated
    pub fn vertex_buffer_size(&self) -> Option<usize> {
        self.vertex_buffer_size
    }

    /// Decode the most recent vertex upload
    pub fn uploaded_vertices(&self) -> Vec<Vertex> {
        bytemuck::pod_collect_to_vec(&self.vertex_data)
    }

    /// `(first_vertex, vertex_count)` of every recorded draw
    pub fn draw_calls(&self) -> Vec<(u32, u32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match *cmd {
                BackendCommand::DrawTriangles {
                    first_vertex,
                    vertex_count,
                } => Some((first_vertex, vertex_count)),
                _ => None,
            })
            .collect()
    }

    /// Currently bound texture
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_texture(&mut self, width: u32, height: u32, format: PixelFormat) -> RenderResult<TextureId> {
        if width == 0 || height == 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "Invalid texture size {width}x{height}"
            )));
        }
        let id = self.textures.insert(RecordedTexture {
            width,
            height,
            format,
            contents: None,
            uploads: 0,
        });
        log::trace!("Created {width}x{height} {format} texture {id:?}");
        self.commands.push(BackendCommand::CreateTexture {
            id,
            width,
            height,
            format,
        });
        Ok(id)
    }

    fn upload_texture(&mut self, id: TextureId, pixmap: &Pixmap) -> RenderResult<()> {
        let texture = self.textures.get_mut(id).ok_or(RenderError::UnknownTexture(id))?;
        if (texture.width, texture.height, texture.format) != (pixmap.width(), pixmap.height(), pixmap.format()) {
            return Err(RenderError::RenderingFailed(format!(
                "Upload of {:?} into {}x{} {} texture",
                pixmap, texture.width, texture.height, texture.format
            )));
        }
        texture.contents = Some(pixmap.clone());
        texture.uploads += 1;
        self.commands.push(BackendCommand::UploadTexture(id));
        Ok(())
    }

    fn bind_texture(&mut self, id: Option<TextureId>) -> RenderResult<()> {
        if let Some(id) = id {
            if !self.textures.contains_key(id) {
                return Err(RenderError::UnknownTexture(id));
            }
        }
        self.bound_texture = id;
        self.commands.push(BackendCommand::BindTexture(id));
        Ok(())
    }

    fn use_program(&mut self, program: Program) -> RenderResult<()> {
        self.program = Some(program);
        self.commands.push(BackendCommand::UseProgram(program));
        Ok(())
    }

    fn set_transform(&mut self, matrix: &Mat4) -> RenderResult<()> {
        if self.program.is_none() {
            return Err(RenderError::RenderingFailed(
                "Transform set with no program in use".to_string(),
            ));
        }
        self.commands.push(BackendCommand::SetTransform(*matrix));
        Ok(())
    }

    fn allocate_vertex_buffer(&mut self, size_bytes: usize) -> RenderResult<()> {
        self.vertex_buffer_size = Some(size_bytes);
        self.commands.push(BackendCommand::AllocateVertexBuffer(size_bytes));
        Ok(())
    }

    fn upload_vertices(&mut self, data: &[u8]) -> RenderResult<()> {
        let capacity = self.vertex_buffer_size.ok_or_else(|| {
            RenderError::RenderingFailed("Vertex upload before buffer allocation".to_string())
        })?;
        if data.len() > capacity {
            return Err(RenderError::RenderingFailed(format!(
                "Vertex upload of {} bytes exceeds buffer of {capacity} bytes",
                data.len()
            )));
        }
        self.vertex_data = data.to_vec();
        self.commands.push(BackendCommand::UploadVertices(data.len()));
        Ok(())
    }

    fn draw_triangles(&mut self, first_vertex: u32, vertex_count: u32) -> RenderResult<()> {
        let available = self.vertex_data.len() / std::mem::size_of::<Vertex>();
        let end = first_vertex as usize + vertex_count as usize;
        if end > available {
            return Err(RenderError::RenderingFailed(format!(
                "Draw of vertices {first_vertex}..{end} exceeds {available} uploaded"
            )));
        }
        self.commands.push(BackendCommand::DrawTriangles {
            first_vertex,
            vertex_count,
        });
        Ok(())
    }
}
