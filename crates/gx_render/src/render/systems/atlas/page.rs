//! Shelf-packed atlas page
//!
//! Pixmaps are placed left to right on horizontal shelves. A shelf is as
//! tall as the tallest pixmap placed on it; when the next pixmap does not fit
//! horizontally a new shelf starts below. Placed rectangles never move.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::assets::{PixelFormat, Pixmap};
use crate::foundation::math::{BoxF, BoxI};
use crate::render::resources::{LazyTexture, Texture, TextureRef};

/// Shelf cursor state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ShelfCursor {
    x: u32,
    row_y: u32,
    row_height: u32,
}

/// One fixed-size page of a texture atlas
#[derive(Debug)]
pub struct AtlasPage {
    width: u32,
    height: u32,
    pixmap: Rc<RefCell<Pixmap>>,
    texture: Rc<LazyTexture>,
    cursor: ShelfCursor,
}

impl AtlasPage {
    /// Create an empty page backed by a zeroed pixmap
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pixmap = Rc::new(RefCell::new(Pixmap::new(width, height, format)));
        let texture = Rc::new(LazyTexture::new(Rc::clone(&pixmap)));
        Self {
            width,
            height,
            pixmap,
            texture,
            cursor: ShelfCursor::default(),
        }
    }

    /// Page width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of the page
    pub fn format(&self) -> PixelFormat {
        self.pixmap.borrow().format()
    }

    /// Backing pixmap
    pub fn pixmap(&self) -> Ref<'_, Pixmap> {
        self.pixmap.borrow()
    }

    /// Deferred texture mirroring the backing pixmap
    pub fn lazy_texture(&self) -> &LazyTexture {
        &self.texture
    }

    /// Shared handle to the page texture
    pub fn texture(&self) -> TextureRef {
        let texture: Rc<dyn Texture> = self.texture.clone();
        TextureRef::from_rc(texture)
    }

    /// Insert a pixmap and return the pixel rectangle it occupies
    ///
    /// Returns `None` when the page is full; the cursor is then untouched.
    pub fn insert_rect(&mut self, pixmap: &Pixmap) -> Option<BoxI> {
        debug_assert_eq!(pixmap.format(), self.format(), "pixmap format must match page");
        let (w, h) = (pixmap.width(), pixmap.height());
        if w > self.width {
            return None;
        }

        let mut cursor = self.cursor;
        if cursor.x + w > self.width {
            cursor.row_y += cursor.row_height;
            cursor.x = 0;
            cursor.row_height = 0;
        }
        if cursor.row_y + h > self.height {
            return None;
        }

        let (x0, y0) = (cursor.x, cursor.row_y);
        cursor.x += w;
        cursor.row_height = cursor.row_height.max(h);
        self.cursor = cursor;

        self.pixmap.borrow_mut().blit(pixmap, x0, y0);
        self.texture.mark_dirty();

        Some(BoxI::from_coords(x0 as i32, y0 as i32, (x0 + w) as i32, (y0 + h) as i32))
    }

    /// Insert a pixmap and return its normalized texture coordinates
    pub fn insert(&mut self, pixmap: &Pixmap) -> Option<BoxF> {
        let rect = self.insert_rect(pixmap)?;
        let (pw, ph) = (self.width as f32, self.height as f32);
        Some(BoxF::from_coords(
            rect.min.x as f32 / pw,
            rect.min.y as f32 / ph,
            rect.max.x as f32 / pw,
            rect.max.y as f32 / ph,
        ))
    }
}
