//! Path building and representation
//!
//! A path is an ordered slice of [`PathOp`]s. There is no implicit starting
//! point: a well-formed path begins with [`PathOp::MoveTo`].

use smallvec::SmallVec;

use crate::error::{DrawError, DrawResult};
use crate::geometry::{Point, Rect, Size};

/// A single path segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    /// Start a new subpath at a point
    MoveTo(Point),
    /// Straight line to a point
    LineTo(Point),
    /// Elliptical arc to a point (SVG endpoint parameterization, no rotation)
    ArcTo {
        point: Point,
        radius: Size,
        large_arc: bool,
        sweep_clockwise: bool,
    },
    /// Cubic Bézier curve to a point
    CurveTo {
        control1: Point,
        control2: Point,
        point: Point,
    },
    /// Close the current subpath
    Close,
}

impl PathOp {
    /// The endpoint of this segment, if it has one
    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => Some(*p),
            PathOp::ArcTo { point, .. } | PathOp::CurveTo { point, .. } => Some(*point),
            PathOp::Close => None,
        }
    }
}

/// Check that `ops` describes a drawable path
pub fn validate(ops: &[PathOp]) -> DrawResult<()> {
    match ops.first() {
        None => Err(DrawError::InvalidGeometry("path has no operations".into())),
        Some(PathOp::MoveTo(_)) => Ok(()),
        Some(first) => Err(DrawError::InvalidGeometry(format!(
            "path must begin with MoveTo, found {:?}",
            first
        ))),
    }
}

/// Bounding box of every point referenced by the path (control points included)
pub fn bounds(ops: &[PathOp]) -> Option<Rect> {
    let mut min = Point::new(f32::INFINITY, f32::INFINITY);
    let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    let mut include = |p: Point| {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    };

    for op in ops {
        match op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) | PathOp::ArcTo { point: p, .. } => include(*p),
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => {
                include(*control1);
                include(*control2);
                include(*point);
            }
            PathOp::Close => {}
        }
    }

    if min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite() {
        Some(Rect::from_points(min, max))
    } else {
        None
    }
}

/// A cubic segment as `(control1, control2, end)`
pub type CubicSegment = (Point, Point, Point);

/// Convert an endpoint arc into cubic Bézier segments
///
/// Returns `None` when the arc degenerates to a straight line (zero radius).
/// Coincident endpoints yield an empty list.
pub fn arc_to_cubics(
    from: Point,
    to: Point,
    radius: Size,
    large_arc: bool,
    sweep_clockwise: bool,
) -> Option<SmallVec<[CubicSegment; 4]>> {
    let mut rx = radius.width.abs();
    let mut ry = radius.height.abs();
    if rx <= f32::EPSILON || ry <= f32::EPSILON {
        return None;
    }
    if from == to {
        return Some(SmallVec::new());
    }

    let x1p = (from.x - to.x) / 2.0;
    let y1p = (from.y - to.y) / 2.0;

    // Scale radii up when they cannot span the endpoints
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep_clockwise {
        coef = -coef;
    }

    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);
    let cx = cxp + (from.x + to.x) / 2.0;
    let cy = cyp + (from.y + to.y) / 2.0;

    let angle = |ux: f32, uy: f32, vx: f32, vy: f32| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let theta1 = angle(1.0, 0.0, ux, uy);
    let mut delta = angle(ux, uy, vx, vy);
    if !sweep_clockwise && delta > 0.0 {
        delta -= std::f32::consts::TAU;
    } else if sweep_clockwise && delta < 0.0 {
        delta += std::f32::consts::TAU;
    }

    let count = (delta.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / count as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut segments = SmallVec::new();
    let mut t1 = theta1;
    for i in 0..count {
        let t2 = t1 + step;
        let (s1, c1) = t1.sin_cos();
        let (s2, c2) = t2.sin_cos();
        let p1 = Point::new(cx + rx * c1, cy + ry * s1);
        let p2 = if i + 1 == count {
            to
        } else {
            Point::new(cx + rx * c2, cy + ry * s2)
        };
        let ctrl1 = Point::new(p1.x - k * rx * s1, p1.y + k * ry * c1);
        let ctrl2 = Point::new(p2.x + k * rx * s2, p2.y - k * ry * c2);
        segments.push((ctrl1, ctrl2, p2));
        t1 = t2;
    }
    Some(segments)
}

/// Builder for constructing paths
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    ops: SmallVec<[PathOp; 16]>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::LineTo(Point::new(x, y)));
        self
    }

    /// Circular arc to `(x, y)`
    pub fn arc_to(mut self, x: f32, y: f32, radius: f32, large_arc: bool, sweep_clockwise: bool) -> Self {
        self.ops.push(PathOp::ArcTo {
            point: Point::new(x, y),
            radius: Size::new(radius, radius),
            large_arc,
            sweep_clockwise,
        });
        self
    }

    pub fn curve_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::CurveTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            point: Point::new(x, y),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[Point]) -> Self {
        let mut builder = Self::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            builder = builder.move_to(first.x, first.y);
            for p in iter {
                builder = builder.line_to(p.x, p.y);
            }
            builder = builder.close();
        }
        builder
    }

    /// Rectangle outline as a closed path
    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.left(), rect.top())
            .line_to(rect.right(), rect.top())
            .line_to(rect.right(), rect.bottom())
            .line_to(rect.left(), rect.bottom())
            .close()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn build(self) -> Vec<PathOp> {
        self.ops.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_builder() {
        let ops = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 0.0)
            .arc_to(100.0, 100.0, 50.0, false, true)
            .curve_to(80.0, 120.0, 20.0, 120.0, 0.0, 100.0)
            .close()
            .build();

        assert_eq!(ops.len(), 5);
        assert!(validate(&ops).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_start() {
        assert!(matches!(validate(&[]), Err(DrawError::InvalidGeometry(_))));
        let ops = PathBuilder::new().line_to(1.0, 1.0).build();
        assert!(matches!(validate(&ops), Err(DrawError::InvalidGeometry(_))));
    }

    #[test]
    fn test_bounds_include_control_points() {
        let ops = PathBuilder::new()
            .move_to(0.0, 0.0)
            .curve_to(-10.0, 50.0, 110.0, 50.0, 100.0, 0.0)
            .build();
        assert_eq!(bounds(&ops), Some(Rect::new(-10.0, 0.0, 120.0, 50.0)));
        assert_eq!(bounds(&[PathOp::Close]), None);
    }

    #[test]
    fn test_semicircle_arc_ends_on_target() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(100.0, 0.0);
        let segments = arc_to_cubics(from, to, Size::new(50.0, 50.0), false, true).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments.last().unwrap().2, to);

        // Clockwise on a y-down surface passes through the top of the circle
        let mid = segments[0].2;
        assert!((mid.x - 50.0).abs() < 1e-3);
        assert!((mid.y + 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_arcs() {
        let p = Point::new(5.0, 5.0);
        assert!(arc_to_cubics(p, Point::new(10.0, 10.0), Size::ZERO, false, false).is_none());
        assert!(arc_to_cubics(p, p, Size::new(3.0, 3.0), false, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_polygon_closes() {
        let ops = PathBuilder::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ])
        .build();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops.last(), Some(&PathOp::Close));
    }
}
