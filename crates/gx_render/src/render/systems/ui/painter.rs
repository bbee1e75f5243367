//! UI painter
//!
//! Immediate-mode 2D drawing facade. A frame is bracketed by
//! [`Painter::start_painting`] and [`Painter::done_painting`]; everything drawn
//! in between is collected by the sprite batcher and submitted at the end.
//!
//! The painter owns the glyph and pixmap caches, which grow for its whole
//! lifetime, and a matrix stack applied to every vertex it emits.

use std::collections::HashMap;

use crate::assets::{PixelFormat, ResourceLoader};
use crate::config::PainterConfig;
use crate::foundation::math::{
    ortho_projection, transform_point, BoxF, Mat4, Rotation3, Vec2, Vec4, Vector3,
};
use crate::render::api::{GraphicsBackend, Program};
use crate::render::resources::{EagerTexture, TextureRef};
use crate::render::systems::atlas::{PackedPixmap, TextureAtlas};
use crate::render::systems::batching::{BatchResult, BatchStats, SpriteBatcher, Vertex};
use crate::render::systems::text::{
    break_lines, FontCache, HorizontalAlign, TextRow, VerticalAlign,
};

/// Font selection key: family name plus pixel height
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    /// Name passed to the resource loader
    pub name: String,
    /// Rasterization height in pixels
    pub pixel_height: u32,
}

impl Font {
    /// Create a font key
    pub fn new(name: impl Into<String>, pixel_height: u32) -> Self {
        Self {
            name: name.into(),
            pixel_height,
        }
    }
}

/// One corner of a quad before transformation
#[derive(Debug, Clone, Copy)]
pub(super) struct Corner {
    pub position: Vec2,
    pub tex_coords: Vec2,
    pub fg_color: Vec4,
}

impl Corner {
    pub fn new(position: Vec2, tex_coords: Vec2, fg_color: Vec4) -> Self {
        Self {
            position,
            tex_coords,
            fg_color,
        }
    }
}

/// 2D painter over a graphics backend
pub struct Painter<B: GraphicsBackend> {
    backend: B,
    loader: Box<dyn ResourceLoader>,
    config: PainterConfig,
    batcher: SpriteBatcher,
    transform: Mat4,
    transform_stack: Vec<Mat4>,
    grayscale_atlas: TextureAtlas,
    rgba_atlas: TextureAtlas,
    fonts: HashMap<Font, FontCache>,
    pixmaps: HashMap<String, Option<PackedPixmap>>,
    current_font: Option<Font>,
    painting: bool,
    scene_box: BoxF,
    horizontal_align: HorizontalAlign,
    vertical_align: VerticalAlign,
}

impl<B: GraphicsBackend> Painter<B> {
    /// Create a painter drawing through `backend`
    ///
    /// The scene starts at the preferred size until [`Painter::resize`] is
    /// called with the real viewport.
    pub fn new(backend: B, loader: Box<dyn ResourceLoader>, config: PainterConfig) -> Self {
        let page = config.atlas_page_size;
        let mut painter = Self {
            backend,
            loader,
            batcher: SpriteBatcher::new(config.vertex_buffer_floats),
            transform: Mat4::identity(),
            transform_stack: Vec::new(),
            grayscale_atlas: TextureAtlas::new(page, page, PixelFormat::Grayscale),
            rgba_atlas: TextureAtlas::new(page, page, PixelFormat::Rgba),
            fonts: HashMap::new(),
            pixmaps: HashMap::new(),
            current_font: None,
            painting: false,
            scene_box: BoxF::default(),
            horizontal_align: HorizontalAlign::default(),
            vertical_align: VerticalAlign::default(),
            config,
        };
        painter.update_scene_box(
            painter.config.preferred_scene_width,
            painter.config.preferred_scene_height,
        );
        log::info!(
            "Painter created: {}px atlas pages, {} quads per batch",
            page,
            painter.batcher.max_quads()
        );
        painter
    }

    /// Graphics backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable graphics backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Painter configuration
    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    /// Sprite batcher collecting this frame's quads
    pub fn sprite_batcher(&self) -> &SpriteBatcher {
        &self.batcher
    }

    /// Atlas holding glyph bitmaps
    pub fn grayscale_atlas(&self) -> &TextureAtlas {
        &self.grayscale_atlas
    }

    /// Atlas holding named pixmaps
    pub fn rgba_atlas(&self) -> &TextureAtlas {
        &self.rgba_atlas
    }

    // Scene

    /// Adapt the scene to a viewport of `width` x `height` pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {width}x{height}");
            return;
        }
        self.update_scene_box(width as f32, height as f32);
    }

    fn update_scene_box(&mut self, width: f32, height: f32) {
        let preferred = Vec2::new(self.config.preferred_scene_width, self.config.preferred_scene_height);
        let preferred_aspect = preferred.x / preferred.y;
        let aspect = width / height;

        // the preferred size is kept along the shorter axis
        let size = if aspect > preferred_aspect {
            Vec2::new(preferred.y * aspect, preferred.y)
        } else {
            Vec2::new(preferred.x, preferred.x / aspect)
        };

        self.scene_box = BoxF::new(-0.5 * size, 0.5 * size);
        self.batcher.set_transform_matrix(ortho_projection(&self.scene_box));
        log::debug!("Scene box {:?}", self.scene_box);
    }

    /// Visible scene area, centered on the origin with y growing downward
    pub fn scene_box(&self) -> BoxF {
        self.scene_box
    }

    // Frame

    /// Begin a frame
    pub fn start_painting(&mut self) {
        if self.painting {
            log::warn!("start_painting called twice without done_painting");
        }
        self.transform_stack.clear();
        self.reset_transform();
        self.current_font = None;
        self.batcher.start_batch();
        self.painting = true;
    }

    /// Submit everything drawn since [`Painter::start_painting`]
    pub fn done_painting(&mut self) -> BatchResult<BatchStats> {
        if !self.painting {
            log::warn!("done_painting called without start_painting");
            return Ok(BatchStats::default());
        }
        self.painting = false;
        self.batcher.render_batch(&mut self.backend)
    }

    /// True inside the painting bracket
    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub(super) fn can_draw(&self) -> bool {
        if !self.painting {
            log::warn!("Draw call outside of start_painting/done_painting");
        }
        self.painting
    }

    // Transform

    /// Current transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Reset the transform to identity
    pub fn reset_transform(&mut self) {
        self.transform = Mat4::identity();
    }

    /// Translate subsequent drawing
    pub fn translate(&mut self, offset: Vec2) {
        self.transform *= Mat4::new_translation(&Vector3::new(offset.x, offset.y, 0.0));
    }

    /// Scale subsequent drawing
    pub fn scale(&mut self, factors: Vec2) {
        self.transform *= Mat4::new_nonuniform_scaling(&Vector3::new(factors.x, factors.y, 1.0));
    }

    /// Rotate subsequent drawing by `angle` radians
    pub fn rotate(&mut self, angle: f32) {
        self.transform *= Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous();
    }

    /// Push the current transform
    pub fn save_transform(&mut self) {
        self.transform_stack.push(self.transform);
    }

    /// Pop the last saved transform
    pub fn restore_transform(&mut self) {
        match self.transform_stack.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("Transform stack underflow"),
        }
    }

    // Resources

    /// Select the font used by text operations, loading it on first use
    pub fn set_font(&mut self, font: Font) {
        let loader = &self.loader;
        self.fonts.entry(font.clone()).or_insert_with(|| {
            let mut cache = FontCache::new();
            match loader.load_font(&font.name) {
                Some(bytes) => {
                    if let Err(e) = cache.load(&bytes, font.pixel_height) {
                        log::error!("Failed to load font {}: {}", font.name, e);
                    }
                }
                None => log::error!("Font {} not found", font.name),
            }
            cache
        });
        self.current_font = Some(font);
    }

    /// Glyph cache of the current font
    pub fn font(&self) -> Option<&FontCache> {
        self.current_font.as_ref().and_then(|key| self.fonts.get(key))
    }

    /// Named pixmap packed for drawing, loaded on first use
    ///
    /// Grayscale images are expanded to RGBA. Images larger than an atlas page
    /// get a texture of their own.
    pub fn pixmap(&mut self, name: &str) -> Option<PackedPixmap> {
        if let Some(cached) = self.pixmaps.get(name) {
            return cached.clone();
        }
        let packed = self.load_pixmap(name);
        self.pixmaps.insert(name.to_string(), packed.clone());
        packed
    }

    fn load_pixmap(&mut self, name: &str) -> Option<PackedPixmap> {
        let Some(source) = self.loader.load_pixmap(name) else {
            log::error!("Pixmap {name} not found");
            return None;
        };
        let pixmap = source.to_rgba();

        if pixmap.width() <= self.rgba_atlas.page_width() && pixmap.height() <= self.rgba_atlas.page_height() {
            return self.rgba_atlas.add_pixmap(&pixmap).ok();
        }

        log::debug!(
            "Pixmap {name} ({}x{}) exceeds atlas page, using dedicated texture",
            pixmap.width(),
            pixmap.height()
        );
        match EagerTexture::new(&mut self.backend, &pixmap) {
            Ok(texture) => Some(PackedPixmap {
                width: pixmap.width(),
                height: pixmap.height(),
                texture_coords: BoxF::from_coords(0.0, 0.0, 1.0, 1.0),
                texture: TextureRef::new(texture),
            }),
            Err(e) => {
                log::error!("Failed to create texture for pixmap {name}: {e}");
                None
            }
        }
    }

    // Text

    /// Horizontal alignment used by [`Painter::draw_text_box`]
    pub fn set_horizontal_align(&mut self, align: HorizontalAlign) {
        self.horizontal_align = align;
    }

    /// Vertical alignment used by [`Painter::draw_text_box`]
    pub fn set_vertical_align(&mut self, align: VerticalAlign) {
        self.vertical_align = align;
    }

    /// Draw a line of text with its baseline starting at `pos`
    pub fn draw_text<I>(&mut self, pos: Vec2, color: Vec4, depth: i32, text: I)
    where
        I: IntoIterator<Item = char>,
    {
        if !self.can_draw() {
            return;
        }
        let Some(cache) = self.current_font.as_ref().and_then(|key| self.fonts.get_mut(key)) else {
            log::warn!("No font set");
            return;
        };

        self.batcher.set_batch_program(Program::Text);
        let mut pen = pos;
        for ch in text {
            let Some(glyph) = cache.glyph(&mut self.grayscale_atlas, ch) else {
                continue;
            };
            if let Some(pixmap) = &glyph.pixmap {
                let bounds = glyph.bounding_box.to_f32();
                let p0 = pen + bounds.min;
                let p1 = pen + bounds.max;
                let (t0, t1) = (pixmap.texture_coords.min, pixmap.texture_coords.max);
                let zero = Vec4::zeros();
                let verts = [
                    Vertex::new(transform_point(&self.transform, p0), t0, color, zero),
                    Vertex::new(
                        transform_point(&self.transform, Vec2::new(p1.x, p0.y)),
                        Vec2::new(t1.x, t0.y),
                        color,
                        zero,
                    ),
                    Vertex::new(transform_point(&self.transform, p1), t1, color, zero),
                    Vertex::new(
                        transform_point(&self.transform, Vec2::new(p0.x, p1.y)),
                        Vec2::new(t0.x, t1.y),
                        color,
                        zero,
                    ),
                ];
                // overflow is logged and counted by the batcher
                let _ = self.batcher.add_sprite(Some(pixmap.texture.clone()), verts, depth);
            }
            pen.x += glyph.advance_width;
        }
    }

    /// Width of `text` in the current font
    pub fn horizontal_advance<I>(&mut self, text: I) -> f32
    where
        I: IntoIterator<Item = char>,
    {
        match self.current_font.as_ref().and_then(|key| self.fonts.get_mut(key)) {
            Some(cache) => cache.horizontal_advance(&mut self.grayscale_atlas, text),
            None => {
                log::warn!("No font set");
                0.0
            }
        }
    }

    /// Greedily wrap `text` into rows no wider than `max_width`
    pub fn break_text_lines<'t>(&mut self, text: &'t str, max_width: f32) -> Vec<TextRow<'t>> {
        let Some(cache) = self.current_font.as_ref().and_then(|key| self.fonts.get_mut(key)) else {
            log::warn!("No font set");
            return Vec::new();
        };
        let atlas = &mut self.grayscale_atlas;
        break_lines(text, max_width, |ch| {
            cache.glyph(atlas, ch).map_or(0.0, |glyph| glyph.advance_width)
        })
    }

    fn paragraph_size(&self, rows: &[TextRow<'_>]) -> Vec2 {
        let line_height = self.font().map_or(0.0, FontCache::line_height);
        let width = rows.iter().map(|row| row.width).fold(0.0, f32::max);
        Vec2::new(width, rows.len() as f32 * line_height)
    }

    /// Size of `text` wrapped to `max_width`
    pub fn text_box_size(&mut self, max_width: f32, text: &str) -> Vec2 {
        let rows = self.break_text_lines(text, max_width);
        self.paragraph_size(&rows)
    }

    /// Draw `text` wrapped and aligned inside `bounds`; returns the paragraph size
    pub fn draw_text_box(&mut self, bounds: &BoxF, color: Vec4, depth: i32, text: &str) -> Vec2 {
        if !self.can_draw() {
            return Vec2::zeros();
        }
        let rows = self.break_text_lines(text, bounds.width());
        let size = self.paragraph_size(&rows);
        let (ascent, line_height) = self
            .font()
            .map_or((0.0, 0.0), |font| (font.ascent(), font.line_height()));

        let top = bounds.min.y + self.vertical_align.offset(size.y, bounds.height());
        for (i, row) in rows.iter().enumerate() {
            let x = bounds.min.x + self.horizontal_align.offset(row.width, bounds.width());
            let baseline = top + ascent + i as f32 * line_height;
            self.draw_text(Vec2::new(x, baseline), color, depth, row.text.chars());
        }
        size
    }

    // Quads

    /// Transform and batch one quad drawn with `program`
    pub(super) fn add_quad(
        &mut self,
        program: Program,
        texture: Option<TextureRef>,
        corners: [Corner; 4],
        bg_color: Vec4,
        aux: Vec4,
        depth: i32,
    ) {
        let transform = &self.transform;
        let verts = corners.map(|c| {
            Vertex::new(transform_point(transform, c.position), c.tex_coords, c.fg_color, bg_color)
                .with_aux(aux)
        });
        self.batcher.set_batch_program(program);
        // overflow is logged and counted by the batcher
        let _ = self.batcher.add_sprite(texture, verts, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MemoryAssets, Pixmap};
    use crate::render::backends::RecordingBackend;
    use approx::assert_relative_eq;

    fn painter_with(assets: MemoryAssets) -> Painter<RecordingBackend> {
        let config = PainterConfig {
            atlas_page_size: 64,
            ..PainterConfig::default()
        };
        Painter::new(RecordingBackend::new(), Box::new(assets), config)
    }

    #[test]
    fn test_scene_box_keeps_preferred_size() {
        let mut painter = painter_with(MemoryAssets::new());
        let scene = painter.scene_box();
        assert_relative_eq!(scene.min, Vec2::new(-640.0, -360.0), epsilon = 1e-3);
        assert_relative_eq!(scene.max, Vec2::new(640.0, 360.0), epsilon = 1e-3);

        painter.resize(2000, 1000);
        let scene = painter.scene_box();
        assert_relative_eq!(scene.height(), 720.0);
        assert_relative_eq!(scene.width(), 1440.0);

        painter.resize(1000, 1000);
        let scene = painter.scene_box();
        assert_relative_eq!(scene.width(), 1280.0);
        assert_relative_eq!(scene.height(), 1280.0);
        assert_relative_eq!(scene.center(), Vec2::zeros());
    }

    #[test]
    fn test_transform_stack() {
        let mut painter = painter_with(MemoryAssets::new());
        painter.start_painting();
        painter.translate(Vec2::new(10.0, 0.0));
        painter.save_transform();
        painter.scale(Vec2::new(2.0, 2.0));
        assert_relative_eq!(
            transform_point(painter.transform(), Vec2::new(1.0, 1.0)),
            Vec2::new(12.0, 2.0)
        );

        painter.restore_transform();
        assert_relative_eq!(
            transform_point(painter.transform(), Vec2::new(1.0, 1.0)),
            Vec2::new(11.0, 1.0)
        );

        // underflow is a logged no-op
        painter.restore_transform();
        assert_relative_eq!(
            transform_point(painter.transform(), Vec2::new(1.0, 1.0)),
            Vec2::new(11.0, 1.0)
        );

        painter.rotate(crate::foundation::math::constants::PI / 2.0);
        assert_relative_eq!(
            transform_point(painter.transform(), Vec2::new(1.0, 0.0)),
            Vec2::new(10.0, 1.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_start_painting_resets_state() {
        let mut painter = painter_with(MemoryAssets::new());
        painter.start_painting();
        painter.translate(Vec2::new(5.0, 5.0));
        painter.save_transform();
        painter.set_font(Font::new("missing.ttf", 12));
        painter.done_painting().unwrap();

        painter.start_painting();
        assert_eq!(*painter.transform(), Mat4::identity());
        assert!(painter.font().is_none());
        painter.restore_transform();
        assert_eq!(*painter.transform(), Mat4::identity());
    }

    #[test]
    fn test_missing_font_is_inert() {
        let mut painter = painter_with(MemoryAssets::new());
        painter.start_painting();
        painter.set_font(Font::new("missing.ttf", 12));
        assert!(!painter.font().unwrap().is_loaded());
        painter.draw_text(Vec2::zeros(), Vec4::repeat(1.0), 0, "hello".chars());
        assert_relative_eq!(painter.horizontal_advance("hello".chars()), 0.0);
        assert_eq!(painter.sprite_batcher().quad_count(), 0);
    }

    #[test]
    fn test_pixmaps_are_cached_and_packed() {
        let assets = MemoryAssets::new()
            .with_pixmap("icon", Pixmap::filled(8, 8, PixelFormat::Grayscale, &[200]))
            .with_pixmap("backdrop", Pixmap::new(100, 20, PixelFormat::Rgba));
        let mut painter = painter_with(assets);

        let icon = painter.pixmap("icon").unwrap();
        assert_eq!((icon.width, icon.height), (8, 8));
        assert_eq!(painter.rgba_atlas().page_count(), 1);
        assert_eq!(painter.pixmap("icon"), Some(icon.clone()));
        assert_eq!(painter.rgba_atlas().page_count(), 1);

        // wider than a 64px page
        let backdrop = painter.pixmap("backdrop").unwrap();
        assert_eq!(backdrop.texture_coords, BoxF::from_coords(0.0, 0.0, 1.0, 1.0));
        assert_ne!(backdrop.texture, icon.texture);
        assert_eq!(painter.backend().texture_count(), 1);

        assert!(painter.pixmap("nope").is_none());
    }

    #[test]
    fn test_done_painting_without_start() {
        let mut painter = painter_with(MemoryAssets::new());
        assert_eq!(painter.done_painting().unwrap(), BatchStats::default());
        assert!(painter.backend().commands().is_empty());
    }
}
