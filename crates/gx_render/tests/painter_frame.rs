//! End-to-end painter frames on the recording backend

use approx::assert_relative_eq;
use gx_render::foundation::logging;
use gx_render::foundation::math::ortho_projection;
use gx_render::prelude::*;
use gx_render::render::BackendCommand;

const FONT_NAME: &str = "sans.ttf";

const TEST_FONT: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

fn painter(assets: MemoryAssets) -> Painter<RecordingBackend> {
    logging::init();
    Painter::new(RecordingBackend::new(), Box::new(assets), PainterConfig::default())
}

fn text_painter() -> Painter<RecordingBackend> {
    painter(MemoryAssets::new().with_font(FONT_NAME, TEST_FONT.to_vec()))
}

#[test]
fn shape_frame_submits_in_depth_order() {
    let assets = MemoryAssets::new().with_pixmap("badge", Pixmap::filled(16, 16, PixelFormat::Rgba, &[255; 4]));
    let mut painter = painter(assets);
    painter.resize(1280, 720);

    painter.start_painting();
    let badge = painter.pixmap("badge").expect("badge is registered");
    painter.draw_pixmap(Vec2::new(0.0, 0.0), &badge, 2);
    painter.draw_circle(Vec2::zeros(), 10.0, Vec4::repeat(1.0), Vec4::repeat(0.0), 1.0, 1);
    painter.draw_circle(Vec2::new(30.0, 0.0), 10.0, Vec4::repeat(1.0), Vec4::repeat(0.0), 1.0, 1);
    painter.draw_thick_line(Vec2::zeros(), Vec2::new(50.0, 50.0), 3.0, Vec4::repeat(1.0), Vec4::repeat(1.0), 0);
    let stats = painter.done_painting().unwrap();

    assert_eq!(stats.quad_count, 4);
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.dropped_quads, 0);

    let commands = painter.backend().commands();
    let programs: Vec<Program> = commands
        .iter()
        .filter_map(|c| match c {
            BackendCommand::UseProgram(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(programs, [Program::ThickLine, Program::Circle, Program::Decal]);

    let projection = ortho_projection(&painter.scene_box());
    assert!(commands
        .iter()
        .filter_map(|c| match c {
            BackendCommand::SetTransform(m) => Some(m),
            _ => None,
        })
        .all(|m| *m == projection));

    assert_eq!(painter.backend().draw_calls(), [(0, 6), (6, 12), (18, 6)]);
}

#[test]
fn atlas_page_uploads_once_per_change() {
    let assets = MemoryAssets::new()
        .with_pixmap("a", Pixmap::filled(8, 8, PixelFormat::Rgba, &[1; 4]))
        .with_pixmap("b", Pixmap::filled(8, 8, PixelFormat::Rgba, &[2; 4]));
    let mut painter = painter(assets);

    let a = painter.pixmap("a").unwrap();
    for _ in 0..2 {
        painter.start_painting();
        painter.draw_pixmap(Vec2::zeros(), &a, 0);
        painter.done_painting().unwrap();
    }
    assert_eq!(painter.backend().texture_count(), 1);
    let uploads = |p: &Painter<RecordingBackend>| {
        p.backend()
            .commands()
            .iter()
            .filter(|c| matches!(c, BackendCommand::UploadTexture(_)))
            .count()
    };
    assert_eq!(uploads(&painter), 1);

    // packing another pixmap dirties the shared page
    let b = painter.pixmap("b").unwrap();
    assert_eq!(a.texture, b.texture);
    painter.start_painting();
    painter.draw_pixmap(Vec2::zeros(), &b, 0);
    painter.done_painting().unwrap();
    assert_eq!(uploads(&painter), 2);
}

#[test]
fn capacity_overflow_is_reported() {
    let config = PainterConfig {
        vertex_buffer_floats: 96 * 3,
        ..PainterConfig::default()
    };
    logging::init();
    let mut painter = Painter::new(RecordingBackend::new(), Box::new(MemoryAssets::new()), config);

    painter.start_painting();
    for i in 0..5 {
        painter.draw_circle(Vec2::new(i as f32, 0.0), 1.0, Vec4::repeat(1.0), Vec4::repeat(1.0), 0.0, 0);
    }
    let stats = painter.done_painting().unwrap();
    assert_eq!(stats.quad_count, 3);
    assert_eq!(stats.dropped_quads, 2);
}

#[test]
fn config_file_drives_painter() {
    let path = std::env::temp_dir().join(format!("gx_render_painter_{}.toml", std::process::id()));
    std::fs::write(&path, "atlas_page_size = 128\npreferred_scene_width = 800.0\npreferred_scene_height = 600.0\n").unwrap();
    let config = PainterConfig::load_from_file(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    let painter = Painter::new(RecordingBackend::new(), Box::new(MemoryAssets::new()), config);
    assert_eq!(painter.rgba_atlas().page_width(), 128);
    assert_relative_eq!(painter.scene_box().width(), 800.0, epsilon = 1e-3);
    assert_relative_eq!(painter.scene_box().height(), 600.0, epsilon = 1e-3);
}

#[test]
fn text_reuses_cached_glyphs_across_frames() {
    let mut painter = text_painter();

    painter.start_painting();
    painter.set_font(Font::new(FONT_NAME, 24));
    painter.draw_text(Vec2::zeros(), Vec4::repeat(1.0), 0, "hello hello".chars());
    let first = painter.done_painting().unwrap();
    // ten visible glyphs; the space has no pixels
    assert_eq!(first.quad_count, 10);
    assert_eq!(first.draw_calls, 1);

    let cached = painter.font().unwrap().cached_glyph_count();
    let pages = painter.grayscale_atlas().page_count();
    assert_eq!(cached, 5);

    painter.start_painting();
    painter.set_font(Font::new(FONT_NAME, 24));
    painter.draw_text(Vec2::zeros(), Vec4::repeat(1.0), 0, "hello".chars());
    painter.done_painting().unwrap();

    assert_eq!(painter.font().unwrap().cached_glyph_count(), cached);
    assert_eq!(painter.grayscale_atlas().page_count(), pages);
    let uploads = painter
        .backend()
        .commands()
        .iter()
        .filter(|c| matches!(c, BackendCommand::UploadTexture(_)))
        .count();
    assert_eq!(uploads, 1);
}

#[test]
fn broken_rows_match_measured_advance() {
    let mut painter = text_painter();
    painter.start_painting();
    painter.set_font(Font::new(FONT_NAME, 18));

    let text = "Sphinx of black quartz, judge my vow. The quick brown fox jumps over the lazy dog.";
    for max_width in [80.0, 150.0, 400.0] {
        let rows: Vec<(String, f32)> = painter
            .break_text_lines(text, max_width)
            .into_iter()
            .map(|row| (row.text.to_string(), row.width))
            .collect();

        let rebuilt: Vec<&str> = rows.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(rebuilt.join(" "), text);

        for (row, width) in &rows {
            let measured = painter.horizontal_advance(row.chars());
            assert_relative_eq!(*width, measured, epsilon = 1e-2);
            assert!(*width <= max_width || !row.contains(' '), "{row:?} is {width} wide");
        }
    }

    let rows = painter.break_text_lines("hello world", 10000.0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text, "hello world");
}

#[test]
fn text_box_is_aligned_inside_bounds() {
    let mut painter = text_painter();
    painter.start_painting();
    painter.set_font(Font::new(FONT_NAME, 20));
    painter.set_horizontal_align(HorizontalAlign::Right);
    painter.set_vertical_align(VerticalAlign::Bottom);

    let bounds = BoxF::from_coords(-200.0, -100.0, 200.0, 100.0);
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
    let expected = painter.text_box_size(bounds.width(), text);
    let size = painter.draw_text_box(&bounds, Vec4::repeat(1.0), 0, text);
    assert_relative_eq!(size, expected);

    let line_height = painter.font().unwrap().line_height();
    let rows = painter.break_text_lines(text, bounds.width()).len();
    assert!(rows >= 2);
    assert_relative_eq!(size.y, rows as f32 * line_height, epsilon = 1e-3);
    assert!(size.x <= bounds.width());

    painter.done_painting().unwrap();
    let vertices = painter.backend().uploaded_vertices();
    assert!(!vertices.is_empty());
    // right-aligned glyphs end close to the right edge, none past it by more than a pixel
    let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
    assert!(max_x <= bounds.max.x + 1.0, "max x {max_x}");
    assert!(max_x >= bounds.max.x - 20.0, "max x {max_x}");
}

#[test]
fn missing_resources_skip_quietly() {
    let mut painter = painter(MemoryAssets::new());
    painter.start_painting();
    painter.set_font(Font::new("absent.ttf", 16));
    painter.draw_text(Vec2::zeros(), Vec4::repeat(1.0), 0, "text".chars());
    assert_relative_eq!(painter.draw_text_box(&BoxF::from_coords(0.0, 0.0, 10.0, 10.0), Vec4::repeat(1.0), 0, "x").x, 0.0);
    assert!(painter.pixmap("absent.png").is_none());
    let stats = painter.done_painting().unwrap();
    assert_eq!(stats.quad_count, 0);
}
