//! Multi-page texture atlas
//!
//! Owns any number of [`AtlasPage`]s sharing one pixel format and page size.
//! The atlas only grows: a pixmap that fits no existing page opens a new one.

use crate::assets::{PixelFormat, Pixmap};
use crate::foundation::math::BoxF;
use crate::render::resources::TextureRef;

use super::page::AtlasPage;

/// Errors returned when a pixmap cannot be added to an atlas
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    /// Pixmap format differs from the atlas format
    #[error("Invalid pixmap format {actual} for {expected} texture atlas")]
    FormatMismatch {
        /// Atlas pixel format
        expected: PixelFormat,
        /// Pixmap pixel format
        actual: PixelFormat,
    },

    /// Pixmap is larger than a page
    #[error("Pixmap {width}x{height} too large for {page_width}x{page_height} atlas page")]
    TooLarge {
        /// Pixmap width
        width: u32,
        /// Pixmap height
        height: u32,
        /// Page width
        page_width: u32,
        /// Page height
        page_height: u32,
    },
}

/// Result type for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// A pixmap stored in an atlas page
#[derive(Debug, Clone, PartialEq)]
pub struct PackedPixmap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Normalized coordinates of the pixmap within its texture
    pub texture_coords: BoxF,
    /// Texture holding the pixels
    pub texture: TextureRef,
}

/// Texture atlas made of equally sized pages
#[derive(Debug)]
pub struct TextureAtlas {
    page_width: u32,
    page_height: u32,
    format: PixelFormat,
    pages: Vec<AtlasPage>,
}

impl TextureAtlas {
    /// Create an atlas with no pages
    pub fn new(page_width: u32, page_height: u32, format: PixelFormat) -> Self {
        Self {
            page_width,
            page_height,
            format,
            pages: Vec::new(),
        }
    }

    /// Page width in pixels
    pub fn page_width(&self) -> u32 {
        self.page_width
    }

    /// Page height in pixels
    pub fn page_height(&self) -> u32 {
        self.page_height
    }

    /// Pixel format shared by all pages
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Number of pages allocated so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by creation index
    pub fn page(&self, index: usize) -> &AtlasPage {
        &self.pages[index]
    }

    /// Texture of a page by creation index
    pub fn page_texture(&self, index: usize) -> TextureRef {
        self.pages[index].texture()
    }

    /// Copy `pixmap` into the atlas
    ///
    /// Existing pages are tried in creation order before a new page is opened.
    pub fn add_pixmap(&mut self, pixmap: &Pixmap) -> AtlasResult<PackedPixmap> {
        if pixmap.format() != self.format {
            log::warn!("Invalid pixmap format {} for {} texture atlas", pixmap.format(), self.format);
            return Err(AtlasError::FormatMismatch {
                expected: self.format,
                actual: pixmap.format(),
            });
        }
        if pixmap.width() > self.page_width || pixmap.height() > self.page_height {
            log::warn!(
                "Pixmap {}x{} too large for texture atlas",
                pixmap.width(),
                pixmap.height()
            );
            return Err(AtlasError::TooLarge {
                width: pixmap.width(),
                height: pixmap.height(),
                page_width: self.page_width,
                page_height: self.page_height,
            });
        }

        let hit = self
            .pages
            .iter_mut()
            .enumerate()
            .find_map(|(index, page)| page.insert(pixmap).map(|coords| (index, coords)));

        let (index, texture_coords) = match hit {
            Some(hit) => hit,
            None => {
                let mut page = AtlasPage::new(self.page_width, self.page_height, self.format);
                let coords = page
                    .insert(pixmap)
                    .expect("pixmap that fits the page size must fit an empty page");
                self.pages.push(page);
                log::debug!(
                    "Texture atlas ({}) grew to {} pages",
                    self.format,
                    self.pages.len()
                );
                (self.pages.len() - 1, coords)
            }
        };

        Ok(PackedPixmap {
            width: pixmap.width(),
            height: pixmap.height(),
            texture_coords,
            texture: self.pages[index].texture(),
        })
    }
}
