//! Shape drawing
//!
//! Every shape is one or more quads; the per-program shaders turn the
//! texture coordinates and `aux` parameters into coverage. Untextured
//! programs receive shape-local coordinates in `[-1, 1]` as texture
//! coordinates.

use crate::foundation::math::{BoxF, Vec2, Vec4};
use crate::render::api::{GraphicsBackend, Program};
use crate::render::systems::atlas::PackedPixmap;

use super::painter::{Corner, Painter};

/// Corners of `bounds` paired with the corners of `tex`, in winding order
fn box_corners(bounds: &BoxF, tex: &BoxF, color: Vec4) -> [Corner; 4] {
    let (positions, tex_coords) = (bounds.corners(), tex.corners());
    std::array::from_fn(|i| Corner::new(positions[i], tex_coords[i], color))
}

fn unit_square() -> BoxF {
    BoxF::from_coords(-1.0, -1.0, 1.0, 1.0)
}

fn square_around(center: Vec2, half_size: f32) -> BoxF {
    BoxF::new(center - Vec2::repeat(half_size), center + Vec2::repeat(half_size))
}

/// Fraction of the radius covered by the fill
fn inner_fraction(radius: f32, outline_size: f32) -> f32 {
    if radius <= 0.0 {
        0.0
    } else {
        ((radius - outline_size) / radius).clamp(0.0, 1.0)
    }
}

impl<B: GraphicsBackend> Painter<B> {
    /// Draw a filled circle with an outline
    pub fn draw_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        fill_color: Vec4,
        outline_color: Vec4,
        outline_size: f32,
        depth: i32,
    ) {
        if !self.can_draw() {
            return;
        }
        let corners = box_corners(&square_around(center, radius), &unit_square(), outline_color);
        let aux = Vec4::new(inner_fraction(radius, outline_size), 0.0, 0.0, 0.0);
        self.add_quad(Program::Circle, None, corners, fill_color, aux, depth);
    }

    /// Draw a filled rectangle with rounded corners and an outline
    ///
    /// Drawn as a 3x3 grid: four corner quads sample a quarter of the circle,
    /// the four edge strips sample its radius along one axis and the center
    /// samples its middle.
    pub fn draw_rounded_rect(
        &mut self,
        bounds: &BoxF,
        radius: f32,
        fill_color: Vec4,
        outline_color: Vec4,
        outline_size: f32,
        depth: i32,
    ) {
        if !self.can_draw() {
            return;
        }
        let radius = radius.min(0.5 * bounds.width()).min(0.5 * bounds.height()).max(0.0);
        let aux = Vec4::new(inner_fraction(radius, outline_size), 0.0, 0.0, 0.0);

        let xs = [bounds.min.x, bounds.min.x + radius, bounds.max.x - radius, bounds.max.x];
        let ys = [bounds.min.y, bounds.min.y + radius, bounds.max.y - radius, bounds.max.y];
        let ts = [-1.0, 0.0, 0.0, 1.0];

        for row in 0..3 {
            for col in 0..3 {
                let cell = BoxF::from_coords(xs[col], ys[row], xs[col + 1], ys[row + 1]);
                if cell.width() <= 0.0 || cell.height() <= 0.0 {
                    continue;
                }
                let tex = BoxF::from_coords(ts[col], ts[row], ts[col + 1], ts[row + 1]);
                let corners = box_corners(&cell, &tex, outline_color);
                self.add_quad(Program::Circle, None, corners, fill_color, aux, depth);
            }
        }
    }

    /// Draw a line segment `thickness` wide, blending between the end colors
    pub fn draw_thick_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        thickness: f32,
        from_color: Vec4,
        to_color: Vec4,
        depth: i32,
    ) {
        if !self.can_draw() {
            return;
        }
        let direction = to - from;
        let length = direction.norm();
        if length <= f32::EPSILON {
            return;
        }
        let normal = Vec2::new(-direction.y, direction.x) * (0.5 * thickness / length);

        let corners = [
            Corner::new(from + normal, Vec2::new(0.0, -1.0), from_color),
            Corner::new(to + normal, Vec2::new(1.0, -1.0), to_color),
            Corner::new(to - normal, Vec2::new(1.0, 1.0), to_color),
            Corner::new(from - normal, Vec2::new(0.0, 1.0), from_color),
        ];
        let aux = Vec4::new(thickness, length, 0.0, 0.0);
        self.add_quad(Program::ThickLine, None, corners, Vec4::zeros(), aux, depth);
    }

    /// Draw a circle surrounded by a soft glow
    ///
    /// The glow extends `glow_distance * radius` beyond the circle.
    pub fn draw_glow_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Vec4,
        bg_color: Vec4,
        glow_distance: f32,
        glow_strength: f32,
        depth: i32,
    ) {
        if !self.can_draw() {
            return;
        }
        let outer = radius * (1.0 + glow_distance.max(0.0));
        if outer <= 0.0 {
            return;
        }
        let corners = box_corners(&square_around(center, outer), &unit_square(), color);
        let aux = Vec4::new(radius / outer, glow_strength, 0.0, 0.0);
        self.add_quad(Program::GlowCircle, None, corners, bg_color, aux, depth);
    }

    /// Draw a circular gauge filled from `start_angle` to `current_angle`
    pub fn draw_circle_gauge(
        &mut self,
        center: Vec2,
        radius: f32,
        bg_color: Vec4,
        fg_color: Vec4,
        start_angle: f32,
        end_angle: f32,
        current_angle: f32,
        depth: i32,
    ) {
        if !self.can_draw() {
            return;
        }
        let corners = box_corners(&square_around(center, radius), &unit_square(), fg_color);
        let aux = Vec4::new(start_angle, end_angle, current_angle, 0.0);
        self.add_quad(Program::CircleGauge, None, corners, bg_color, aux, depth);
    }

    /// Draw a packed pixmap at its natural size with its top-left corner at `pos`
    pub fn draw_pixmap(&mut self, pos: Vec2, pixmap: &PackedPixmap, depth: i32) {
        if !self.can_draw() {
            return;
        }
        let size = Vec2::new(pixmap.width as f32, pixmap.height as f32);
        let bounds = BoxF::new(pos, pos + size);
        let corners = box_corners(&bounds, &pixmap.texture_coords, Vec4::repeat(1.0));
        self.add_quad(
            Program::Decal,
            Some(pixmap.texture.clone()),
            corners,
            Vec4::zeros(),
            Vec4::zeros(),
            depth,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MemoryAssets, PixelFormat, Pixmap};
    use crate::config::PainterConfig;
    use crate::render::backends::{BackendCommand, RecordingBackend};
    use crate::render::systems::batching::{Vertex, VERTICES_PER_QUAD};
    use approx::assert_relative_eq;

    fn painter() -> Painter<RecordingBackend> {
        let assets = MemoryAssets::new().with_pixmap("dot", Pixmap::filled(4, 4, PixelFormat::Rgba, &[9; 4]));
        let mut painter = Painter::new(RecordingBackend::new(), Box::new(assets), PainterConfig::default());
        painter.start_painting();
        painter
    }

    fn quads(painter: &Painter<RecordingBackend>) -> Vec<Vec<Vertex>> {
        painter
            .backend()
            .uploaded_vertices()
            .chunks(VERTICES_PER_QUAD)
            .map(<[Vertex]>::to_vec)
            .collect()
    }

    fn programs(painter: &Painter<RecordingBackend>) -> Vec<Program> {
        painter
            .backend()
            .commands()
            .iter()
            .filter_map(|c| match c {
                BackendCommand::UseProgram(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_circle_parameters() {
        let mut painter = painter();
        let fill = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let outline = Vec4::new(0.0, 0.0, 1.0, 1.0);
        painter.draw_circle(Vec2::new(10.0, 20.0), 8.0, fill, outline, 2.0, 0);
        painter.done_painting().unwrap();

        let quads = quads(&painter);
        assert_eq!(quads.len(), 1);
        let v0 = quads[0][0];
        assert_eq!(v0.position, [2.0, 12.0]);
        assert_eq!(v0.tex_coords, [-1.0, -1.0]);
        assert_eq!(v0.fg_color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(v0.bg_color, [1.0, 0.0, 0.0, 1.0]);
        assert_relative_eq!(v0.aux[0], 0.75);
        assert_eq!(programs(&painter), [Program::Circle]);
    }

    #[test]
    fn test_rounded_rect_is_nine_quads() {
        let mut painter = painter();
        let bounds = BoxF::from_coords(0.0, 0.0, 100.0, 50.0);
        painter.draw_rounded_rect(&bounds, 10.0, Vec4::repeat(1.0), Vec4::repeat(0.5), 1.0, 0);
        let stats = painter.done_painting().unwrap();

        assert_eq!(stats.quad_count, 9);
        // all quads share program and texture
        assert_eq!(stats.draw_calls, 1);

        let quads = quads(&painter);
        let center = &quads[4];
        assert_eq!(center[0].position, [10.0, 10.0]);
        assert_eq!(center[2].position, [90.0, 40.0]);
        assert_eq!(center[0].tex_coords, [0.0, 0.0]);
        assert_eq!(quads[0][0].tex_coords, [-1.0, -1.0]);
    }

    #[test]
    fn test_rounded_rect_without_radius_is_one_quad() {
        let mut painter = painter();
        let bounds = BoxF::from_coords(0.0, 0.0, 100.0, 50.0);
        painter.draw_rounded_rect(&bounds, 0.0, Vec4::repeat(1.0), Vec4::repeat(0.5), 1.0, 0);
        assert_eq!(painter.done_painting().unwrap().quad_count, 1);
    }

    #[test]
    fn test_thick_line_geometry() {
        let mut painter = painter();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
        painter.draw_thick_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, red, blue, 0);
        painter.draw_thick_line(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 4.0, red, blue, 0);
        painter.done_painting().unwrap();

        let quads = quads(&painter);
        assert_eq!(quads.len(), 1);
        let q = &quads[0];
        assert_eq!(q[0].position, [0.0, 2.0]);
        assert_eq!(q[1].position, [10.0, 2.0]);
        assert_eq!(q[2].position, [10.0, -2.0]);
        assert_eq!(q[0].fg_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(q[1].fg_color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(q[0].aux, [4.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_glow_and_gauge_parameters() {
        let mut painter = painter();
        let white = Vec4::repeat(1.0);
        painter.draw_glow_circle(Vec2::zeros(), 10.0, white, Vec4::zeros(), 1.0, 0.5, 0);
        painter.draw_circle_gauge(Vec2::zeros(), 10.0, Vec4::zeros(), white, 0.0, 3.0, 1.5, 1);
        painter.done_painting().unwrap();

        let quads = quads(&painter);
        assert_eq!(quads[0][0].position, [-20.0, -20.0]);
        assert_eq!(quads[0][0].aux, [0.5, 0.5, 0.0, 0.0]);
        assert_eq!(quads[1][0].position, [-10.0, -10.0]);
        assert_eq!(quads[1][0].aux, [0.0, 3.0, 1.5, 0.0]);
        assert_eq!(programs(&painter), [Program::GlowCircle, Program::CircleGauge]);
    }

    #[test]
    fn test_pixmap_uses_decal_program_and_transform() {
        let mut painter = painter();
        let dot = painter.pixmap("dot").unwrap();
        painter.translate(Vec2::new(100.0, 0.0));
        painter.draw_pixmap(Vec2::new(1.0, 2.0), &dot, 0);
        painter.done_painting().unwrap();

        let quads = quads(&painter);
        assert_eq!(quads[0][0].position, [101.0, 2.0]);
        assert_eq!(quads[0][2].position, [105.0, 6.0]);
        assert_eq!(quads[0][0].fg_color, [1.0; 4]);
        assert_eq!(programs(&painter), [Program::Decal]);
        assert_eq!(painter.rgba_atlas().page_count(), 1);
        assert_eq!(painter.backend().texture_count(), 1);
    }

    #[test]
    fn test_shapes_outside_frame_are_ignored() {
        let mut painter = painter();
        painter.done_painting().unwrap();
        painter.draw_circle(Vec2::zeros(), 5.0, Vec4::repeat(1.0), Vec4::repeat(1.0), 1.0, 0);
        assert_eq!(painter.sprite_batcher().quad_count(), 0);
    }
}
