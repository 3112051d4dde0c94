//! 2D affine transforms

use crate::geometry::{Point, Rect};

/// 2D affine transformation
///
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation around the origin, angle in radians
    pub fn rotate(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    pub fn rotate_degrees(degrees: f32) -> Self {
        Self::rotate(degrees.to_radians())
    }

    /// Rotation around `center`, angle in radians
    pub fn rotate_around(angle: f32, center: Point) -> Self {
        Self::translate(center.x, center.y)
            .multiply(&Self::rotate(angle))
            .multiply(&Self::translate(-center.x, -center.y))
    }

    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// True when the transform only translates
    pub fn is_translation(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Matrix product `self * other`: the result applies `other` first, then `self`
    pub fn multiply(&self, other: &Transform) -> Transform {
        Transform::new(
            self.a * other.a + self.c * other.b,
            self.b * other.a + self.d * other.b,
            self.a * other.c + self.c * other.d,
            self.b * other.c + self.d * other.d,
            self.a * other.e + self.c * other.f + self.e,
            self.b * other.e + self.d * other.f + self.f,
        )
    }

    /// Apply `self`, then `next`
    pub fn then(&self, next: &Transform) -> Transform {
        next.multiply(self)
    }

    /// Inverse transform, or `None` for a singular matrix
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.f - self.d * self.e) * inv,
            (self.b * self.e - self.a * self.f) * inv,
        ))
    }

    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Axis-aligned bounds of the transformed rectangle
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        if self.is_translation() {
            return rect.translate(self.e, self.f);
        }
        let corners = [
            self.transform_point(Point::new(rect.left(), rect.top())),
            self.transform_point(Point::new(rect.right(), rect.top())),
            self.transform_point(Point::new(rect.right(), rect.bottom())),
            self.transform_point(Point::new(rect.left(), rect.bottom())),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::from_points(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let t = Transform::translate(10.0, 0.0).multiply(&Transform::scale(2.0, 2.0));
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_then_applies_self_first() {
        let t = Transform::scale(2.0, 2.0).then(&Transform::translate(10.0, 0.0));
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::translate(5.0, -3.0)
            .multiply(&Transform::rotate_degrees(30.0))
            .multiply(&Transform::scale(2.0, 0.5));
        let inv = t.inverse().unwrap();
        let p = Point::new(7.0, 11.0);
        assert!(approx(inv.transform_point(t.transform_point(p)), p));
        assert!(t.multiply(&inv).transform_point(p).distance(p) < 1e-3);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_rotate_around_center() {
        let t = Transform::rotate_around(std::f32::consts::PI, Point::new(10.0, 10.0));
        assert!(approx(t.transform_point(Point::new(0.0, 10.0)), Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_transform_rect_bounds() {
        let r = Transform::rotate_degrees(90.0).transform_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        assert!((r.x + 20.0).abs() < 1e-4);
        assert!((r.width - 20.0).abs() < 1e-4);
        assert!((r.height - 10.0).abs() < 1e-4);
    }
}
