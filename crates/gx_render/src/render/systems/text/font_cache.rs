//! Glyph cache for one font at one pixel height
//!
//! Glyphs are rasterized with `fontdue` the first time they are requested and
//! packed into a grayscale [`TextureAtlas`] owned by the caller. Lookups that
//! fail are remembered as well, so a missing glyph costs one hash probe after
//! the first attempt.

use std::collections::HashMap;

use fontdue::{Font as FontFace, FontSettings};

use crate::assets::{PixelFormat, Pixmap};
use crate::foundation::math::BoxI;
use crate::render::systems::atlas::{PackedPixmap, TextureAtlas};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to parse font data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// Font carries no horizontal line metrics
    #[error("Font has no horizontal line metrics")]
    MissingLineMetrics,

    /// Pixel height must be positive
    #[error("Invalid pixel height {0}")]
    InvalidPixelHeight(u32),
}

/// A rasterized glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Bitmap bounds relative to the pen position on the baseline, y down
    pub bounding_box: BoxI,
    /// Horizontal pen advance in pixels
    pub advance_width: f32,
    /// Bitmap location in the atlas; `None` for glyphs with no pixels
    pub pixmap: Option<PackedPixmap>,
}

struct LoadedFace {
    face: FontFace,
    pixel_height: u32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
}

/// Lazily populated glyph cache
#[derive(Default)]
pub struct FontCache {
    loaded: Option<LoadedFace>,
    glyphs: HashMap<char, Option<Glyph>>,
}

impl FontCache {
    /// Create an empty, unloaded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse font bytes and fix the pixel height
    ///
    /// On failure the cache stays unloaded and every lookup yields `None`.
    pub fn load(&mut self, font_data: &[u8], pixel_height: u32) -> FontResult<()> {
        self.loaded = None;
        self.glyphs.clear();

        if pixel_height == 0 {
            return Err(FontError::InvalidPixelHeight(pixel_height));
        }
        let px = pixel_height as f32;
        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let face = FontFace::from_bytes(font_data, settings)
            .map_err(|e| FontError::LoadError(format!("fontdue error: {e}")))?;
        let metrics = face
            .horizontal_line_metrics(px)
            .ok_or(FontError::MissingLineMetrics)?;

        log::info!(
            "Loaded font at {}px (ascent {:.1}, descent {:.1}, line gap {:.1})",
            pixel_height,
            metrics.ascent,
            metrics.descent,
            metrics.line_gap
        );

        self.loaded = Some(LoadedFace {
            face,
            pixel_height,
            ascent: metrics.ascent,
            descent: metrics.descent,
            line_gap: metrics.line_gap,
        });
        Ok(())
    }

    /// True once a font has been loaded successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Pixel height the font was loaded at, zero when unloaded
    pub fn pixel_height(&self) -> u32 {
        self.loaded.as_ref().map_or(0, |f| f.pixel_height)
    }

    /// Distance from the baseline to the top of the tallest glyphs
    pub fn ascent(&self) -> f32 {
        self.loaded.as_ref().map_or(0.0, |f| f.ascent)
    }

    /// Distance from the baseline to the bottom of descenders (negative)
    pub fn descent(&self) -> f32 {
        self.loaded.as_ref().map_or(0.0, |f| f.descent)
    }

    /// Extra spacing between lines
    pub fn line_gap(&self) -> f32 {
        self.loaded.as_ref().map_or(0.0, |f| f.line_gap)
    }

    /// Baseline-to-baseline distance
    pub fn line_height(&self) -> f32 {
        self.ascent() - self.descent() + self.line_gap()
    }

    /// Number of codepoints looked up so far, hits and misses
    pub fn cached_glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Look up a glyph, rasterizing it into `atlas` on first use
    pub fn glyph(&mut self, atlas: &mut TextureAtlas, ch: char) -> Option<&Glyph> {
        let loaded = self.loaded.as_ref()?;
        self.glyphs
            .entry(ch)
            .or_insert_with(|| Self::rasterize(loaded, atlas, ch))
            .as_ref()
    }

    /// Sum of the advances of every character that has a glyph
    pub fn horizontal_advance<I>(&mut self, atlas: &mut TextureAtlas, text: I) -> f32
    where
        I: IntoIterator<Item = char>,
    {
        text.into_iter()
            .filter_map(|ch| self.glyph(atlas, ch).map(|g| g.advance_width))
            .sum()
    }

    fn rasterize(loaded: &LoadedFace, atlas: &mut TextureAtlas, ch: char) -> Option<Glyph> {
        if loaded.face.lookup_glyph_index(ch) == 0 {
            log::debug!("No glyph for {ch:?}");
            return None;
        }

        let (metrics, coverage) = loaded.face.rasterize(ch, loaded.pixel_height as f32);
        let (width, height) = (metrics.width as i32, metrics.height as i32);
        let bounding_box = BoxI::from_coords(
            metrics.xmin,
            -(metrics.ymin + height),
            metrics.xmin + width,
            -metrics.ymin,
        );

        let pixmap = if width > 0 && height > 0 {
            let bitmap = Pixmap::from_raw(
                metrics.width as u32,
                metrics.height as u32,
                PixelFormat::Grayscale,
                coverage,
            )
            .map_err(|e| log::error!("Glyph {ch:?} bitmap rejected: {e}"))
            .ok()?;
            Some(atlas.add_pixmap(&bitmap).ok()?)
        } else {
            None
        };

        Some(Glyph {
            bounding_box,
            advance_width: metrics.advance_width,
            pixmap,
        })
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("loaded", &self.is_loaded())
            .field("pixel_height", &self.pixel_height())
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}
