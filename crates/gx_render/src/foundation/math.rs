//! Math utilities and types
//!
//! Provides the 2D math types used by the painter, atlases and batcher.

use std::ops::{Add, AddAssign, BitOr, BitOrAssign, Mul, MulAssign, Sub};

pub use nalgebra::{Matrix4, Point3, Rotation3, Scalar, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D integer vector type
pub type IVec2 = Vector2<i32>;

/// 4D vector type (colors, shader parameters)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Scalar types usable as rectangle coordinates
pub trait Coord:
    Scalar + Copy + PartialOrd + Default + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
}

impl<T> Coord for T where
    T: Scalar + Copy + PartialOrd + Default + Add<Output = T> + Sub<Output = T> + Mul<Output = T>
{
}

fn partial_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn partial_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// Axis-aligned box defined by its minimum and maximum corners
///
/// A default-constructed box (both corners at the origin) is the "unset" box;
/// see [`Rect::is_null`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Scalar> {
    /// Minimum corner
    pub min: Vector2<T>,
    /// Maximum corner
    pub max: Vector2<T>,
}

/// Floating point box
pub type BoxF = Rect<f32>;

/// Integer box
pub type BoxI = Rect<i32>;

/// Four corner points of a quad, in winding order
pub type QuadF = [Vec2; 4];

impl<T: Coord> Default for Rect<T> {
    fn default() -> Self {
        Self {
            min: Vector2::new(T::default(), T::default()),
            max: Vector2::new(T::default(), T::default()),
        }
    }
}

impl<T: Coord> Rect<T> {
    /// Create a box from its corners
    pub fn new(min: Vector2<T>, max: Vector2<T>) -> Self {
        Self { min, max }
    }

    /// Create a box from corner coordinates
    pub fn from_coords(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self::new(Vector2::new(min_x, min_y), Vector2::new(max_x, max_y))
    }

    /// Width of the box
    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    /// Height of the box
    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    /// Size of the box as a vector
    pub fn size(&self) -> Vector2<T> {
        Vector2::new(self.width(), self.height())
    }

    /// True for the default "unset" box
    pub fn is_null(&self) -> bool {
        let zero = T::default();
        self.min.x == zero && self.min.y == zero && self.max.x == zero && self.max.y == zero
    }

    /// Move the box so its minimum corner lands on `p`, keeping its size
    pub fn move_min(&mut self, p: Vector2<T>) {
        let size = self.size();
        self.min = p;
        self.max = Vector2::new(p.x + size.x, p.y + size.y);
    }

    /// Move the box so its maximum corner lands on `p`, keeping its size
    pub fn move_max(&mut self, p: Vector2<T>) {
        let size = self.size();
        self.max = p;
        self.min = Vector2::new(p.x - size.x, p.y - size.y);
    }

    /// Half-open point containment: `min` is inside, `max` is not
    pub fn contains(&self, p: Vector2<T>) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// True if the two boxes touch or overlap
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }

    /// True if the interiors of the two boxes share any area
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// True if `other` lies entirely inside this box
    pub fn encloses(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

impl BoxF {
    /// Center point of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Corners clockwise from `min` with y growing downward
    pub fn corners(&self) -> QuadF {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

impl BoxI {
    /// Convert to a floating point box
    pub fn to_f32(&self) -> BoxF {
        BoxF::from_coords(
            self.min.x as f32,
            self.min.y as f32,
            self.max.x as f32,
            self.max.y as f32,
        )
    }
}

impl<T: Coord> AddAssign<Vector2<T>> for Rect<T> {
    fn add_assign(&mut self, rhs: Vector2<T>) {
        self.min = Vector2::new(self.min.x + rhs.x, self.min.y + rhs.y);
        self.max = Vector2::new(self.max.x + rhs.x, self.max.y + rhs.y);
    }
}

impl<T: Coord> Add<Vector2<T>> for Rect<T> {
    type Output = Self;

    fn add(mut self, rhs: Vector2<T>) -> Self {
        self += rhs;
        self
    }
}

impl<T: Coord> MulAssign<T> for Rect<T> {
    fn mul_assign(&mut self, scale: T) {
        self.min = Vector2::new(self.min.x * scale, self.min.y * scale);
        self.max = Vector2::new(self.max.x * scale, self.max.y * scale);
    }
}

impl<T: Coord> Mul<T> for Rect<T> {
    type Output = Self;

    fn mul(mut self, scale: T) -> Self {
        self *= scale;
        self
    }
}

impl<T: Coord> BitOrAssign for Rect<T> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.min = Vector2::new(partial_min(self.min.x, rhs.min.x), partial_min(self.min.y, rhs.min.y));
        self.max = Vector2::new(partial_max(self.max.x, rhs.max.x), partial_max(self.max.y, rhs.max.y));
    }
}

impl<T: Coord> BitOr for Rect<T> {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

/// Apply a 4x4 transform to a 2D point lying on the z = 0 plane
pub fn transform_point(matrix: &Mat4, p: Vec2) -> Vec2 {
    let q = matrix.transform_point(&Point3::new(p.x, p.y, 0.0));
    Vec2::new(q.x, q.y)
}

/// Orthographic projection for a scene box with y growing downward
pub fn ortho_projection(scene: &BoxF) -> Mat4 {
    Mat4::new_orthographic(scene.min.x, scene.max.x, scene.max.y, scene.min.y, -1.0, 1.0)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_box_is_null() {
        let b = BoxF::default();
        assert!(b.is_null());
        assert!(!BoxF::from_coords(0.0, 0.0, 1.0, 1.0).is_null());
        assert_ne!(b, BoxF::from_coords(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_union_offset_scale() {
        let a = BoxI::from_coords(0, 0, 2, 2);
        let b = BoxI::from_coords(1, -1, 5, 1);
        assert_eq!(a | b, BoxI::from_coords(0, -1, 5, 2));

        let moved = a + IVec2::new(3, 4);
        assert_eq!(moved, BoxI::from_coords(3, 4, 5, 6));

        let scaled = BoxF::from_coords(1.0, 2.0, 3.0, 4.0) * 2.0;
        assert_eq!(scaled, BoxF::from_coords(2.0, 4.0, 6.0, 8.0));
    }

    #[test]
    fn test_containment_is_half_open() {
        let b = BoxF::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(b.contains(Vec2::new(9.99, 5.0)));
        assert!(!b.contains(Vec2::new(10.0, 5.0)));
        assert!(b.intersects(&BoxF::from_coords(10.0, 10.0, 12.0, 12.0)));
        assert!(!b.overlaps(&BoxF::from_coords(10.0, 0.0, 12.0, 10.0)));
        assert!(b.encloses(&BoxF::from_coords(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn test_move_keeps_size() {
        let mut b = BoxF::from_coords(0.0, 0.0, 4.0, 2.0);
        b.move_min(Vec2::new(10.0, 10.0));
        assert_eq!(b, BoxF::from_coords(10.0, 10.0, 14.0, 12.0));
        b.move_max(Vec2::new(4.0, 2.0));
        assert_eq!(b, BoxF::from_coords(0.0, 0.0, 4.0, 2.0));
        assert_relative_eq!(b.center(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_corners_wind_from_min() {
        let quad = BoxF::from_coords(1.0, 2.0, 3.0, 4.0).corners();
        assert_eq!(quad, [Vec2::new(1.0, 2.0), Vec2::new(3.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(1.0, 4.0)]);
    }

    #[test]
    fn test_ortho_projection_maps_scene_corners() {
        let scene = BoxF::from_coords(-640.0, -360.0, 640.0, 360.0);
        let proj = ortho_projection(&scene);
        let top_left = transform_point(&proj, scene.min);
        let bottom_right = transform_point(&proj, scene.max);
        assert_relative_eq!(top_left, Vec2::new(-1.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(bottom_right, Vec2::new(1.0, -1.0), epsilon = 1e-6);
    }
}
