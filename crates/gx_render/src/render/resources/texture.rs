//! Bindable textures
//!
//! A [`LazyTexture`] mirrors a CPU-side pixmap that keeps changing (an atlas
//! page) and only touches the GPU when it is bound. An [`EagerTexture`] is
//! uploaded once at creation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::assets::Pixmap;
use crate::render::api::{GraphicsBackend, TextureId};
use crate::render::RenderResult;

/// Anything that can be bound for a draw
pub trait Texture {
    /// Make this texture the active one, performing any pending upload first
    fn bind(&self, backend: &mut dyn GraphicsBackend) -> RenderResult<()>;
}

/// Texture created on first bind and re-uploaded whenever marked dirty
pub struct LazyTexture {
    pixmap: Rc<RefCell<Pixmap>>,
    id: Cell<Option<TextureId>>,
    dirty: Cell<bool>,
}

impl LazyTexture {
    /// Wrap a shared pixmap; the first bind uploads it
    pub fn new(pixmap: Rc<RefCell<Pixmap>>) -> Self {
        Self {
            pixmap,
            id: Cell::new(None),
            dirty: Cell::new(true),
        }
    }

    /// Request a re-upload on the next bind
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// True when the next bind will upload
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Backend handle, once the texture has been bound
    pub fn texture_id(&self) -> Option<TextureId> {
        self.id.get()
    }
}

impl Texture for LazyTexture {
    fn bind(&self, backend: &mut dyn GraphicsBackend) -> RenderResult<()> {
        let pixmap = self.pixmap.borrow();
        let id = match self.id.get() {
            Some(id) => id,
            None => {
                let id = backend.create_texture(pixmap.width(), pixmap.height(), pixmap.format())?;
                log::debug!(
                    "Created {}x{} {} texture for deferred upload",
                    pixmap.width(),
                    pixmap.height(),
                    pixmap.format()
                );
                self.id.set(Some(id));
                id
            }
        };
        if self.dirty.get() {
            backend.upload_texture(id, &pixmap)?;
            self.dirty.set(false);
        }
        backend.bind_texture(Some(id))
    }
}

impl fmt::Debug for LazyTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyTexture")
            .field("id", &self.id.get())
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

/// Texture uploaded at construction
#[derive(Debug)]
pub struct EagerTexture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl EagerTexture {
    /// Create and upload a texture holding `pixmap`
    pub fn new(backend: &mut dyn GraphicsBackend, pixmap: &Pixmap) -> RenderResult<Self> {
        let id = backend.create_texture(pixmap.width(), pixmap.height(), pixmap.format())?;
        backend.upload_texture(id, pixmap)?;
        Ok(Self {
            id,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }

    /// Backend handle
    pub fn texture_id(&self) -> TextureId {
        self.id
    }

    /// Texture size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Texture for EagerTexture {
    fn bind(&self, backend: &mut dyn GraphicsBackend) -> RenderResult<()> {
        backend.bind_texture(Some(self.id))
    }
}

/// Shared, identity-compared texture handle
///
/// Two refs are equal only when they point at the same texture object, which
/// is what the batcher needs to decide whether a rebind is required.
#[derive(Clone)]
pub struct TextureRef(Rc<dyn Texture>);

impl TextureRef {
    /// Wrap a texture
    pub fn new<T: Texture + 'static>(texture: T) -> Self {
        Self(Rc::new(texture))
    }

    /// Share an existing reference-counted texture
    pub fn from_rc(texture: Rc<dyn Texture>) -> Self {
        Self(texture)
    }

    /// Bind the underlying texture
    pub fn bind(&self, backend: &mut dyn GraphicsBackend) -> RenderResult<()> {
        self.0.bind(backend)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for TextureRef {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for TextureRef {}

impl fmt::Debug for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureRef({:p})", self.addr())
    }
}
