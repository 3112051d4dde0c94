//! Conversions from drawboard types to tiny-skia

use drawboard_graphics::path::arc_to_cubics;
use drawboard_graphics::{Brush, Color, GradientStop, Pen, PathOp, Point, Rect, Transform};
use tiny_skia::{LinearGradient, Paint, PathBuilder, RadialGradient, Shader, SpreadMode, Stroke};
use tracing::debug;

pub(crate) fn skia_transform(t: &Transform) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.a, t.b, t.c, t.d, t.e, t.f)
}

pub(crate) fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x, p.y)
}

pub(crate) fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

/// Build a tiny-skia path; arcs become cubic segments
///
/// Returns `None` for paths with no drawable segment.
pub(crate) fn build_path(ops: &[PathOp]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;

    for op in ops {
        match *op {
            PathOp::MoveTo(p) => {
                pb.move_to(p.x, p.y);
                current = p;
                start = p;
            }
            PathOp::LineTo(p) => {
                pb.line_to(p.x, p.y);
                current = p;
            }
            PathOp::ArcTo {
                point,
                radius,
                large_arc,
                sweep_clockwise,
            } => {
                match arc_to_cubics(current, point, radius, large_arc, sweep_clockwise) {
                    Some(segments) => {
                        for (c1, c2, p) in segments {
                            pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                        }
                    }
                    None => pb.line_to(point.x, point.y),
                }
                current = point;
            }
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => {
                pb.cubic_to(
                    control1.x, control1.y, control2.x, control2.y, point.x, point.y,
                );
                current = point;
            }
            PathOp::Close => {
                pb.close();
                current = start;
            }
        }
    }

    pb.finish()
}

pub(crate) fn rect_path(rect: Rect) -> Option<tiny_skia::Path> {
    skia_rect(rect).map(PathBuilder::from_rect)
}

pub(crate) fn ellipse_path(rect: Rect) -> Option<tiny_skia::Path> {
    skia_rect(rect).and_then(PathBuilder::from_oval)
}

fn skia_stops(stops: &[GradientStop]) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset, skia_color(s.color)))
        .collect()
}

/// Paint for filling with `brush`; gradients resolve against `bounds`
pub(crate) fn fill_paint(brush: &Brush, bounds: Rect) -> Option<Paint<'static>> {
    let shader = match brush {
        Brush::Solid(solid) => Shader::SolidColor(skia_color(solid.color)),
        Brush::LinearGradient(linear) => {
            let (start, end) = linear.resolve(bounds);
            LinearGradient::new(
                skia_point(start),
                skia_point(end),
                skia_stops(&linear.stops),
                SpreadMode::Pad,
                tiny_skia::Transform::identity(),
            )?
        }
        Brush::RadialGradient(radial) => {
            let (center, focus, radius) = radial.resolve(bounds);
            RadialGradient::new(
                skia_point(focus),
                skia_point(center),
                radius,
                skia_stops(&radial.stops),
                SpreadMode::Pad,
                tiny_skia::Transform::identity(),
            )?
        }
    };

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = true;
    Some(paint)
}

/// Paint and stroke style for `pen`, `None` for zero-width pens
pub(crate) fn stroke_paint(pen: &Pen) -> Option<(Paint<'static>, Stroke)> {
    if pen.width <= 0.0 {
        debug!("Skipping stroke with non-positive width {}", pen.width);
        return None;
    }
    let mut paint = Paint::default();
    paint.set_color(skia_color(pen.color));
    paint.anti_alias = true;
    let stroke = Stroke {
        width: pen.width,
        ..Stroke::default()
    };
    Some((paint, stroke))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_graphics::{Colors, PathBuilder as OpsBuilder, Size};

    #[test]
    fn test_build_path_bounds() {
        let ops = OpsBuilder::new()
            .move_to(10.0, 10.0)
            .line_to(50.0, 10.0)
            .curve_to(60.0, 20.0, 60.0, 40.0, 50.0, 50.0)
            .close()
            .build();
        let path = build_path(&ops).unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.left(), 10.0);
        assert_eq!(bounds.top(), 10.0);
        assert_eq!(bounds.bottom(), 50.0);
    }

    #[test]
    fn test_arc_becomes_curves() {
        let ops = vec![
            PathOp::MoveTo(Point::new(0.0, 50.0)),
            PathOp::ArcTo {
                point: Point::new(100.0, 50.0),
                radius: Size::new(50.0, 50.0),
                large_arc: false,
                sweep_clockwise: true,
            },
        ];
        let path = build_path(&ops).unwrap();
        // Half circle bulging up or down reaches 50 units from the chord
        let bounds = path.bounds();
        assert!((bounds.height() - 50.0).abs() < 0.5);
        assert!(path.segments().count() > 2);
    }

    #[test]
    fn test_move_only_path_is_not_drawable() {
        assert!(build_path(&[PathOp::MoveTo(Point::ZERO)]).is_none());
    }

    #[test]
    fn test_gradient_without_stops_has_no_paint() {
        let brush = Brush::LinearGradient(drawboard_graphics::LinearGradientBrush {
            start: Point::ZERO,
            end: Point::new(0.0, 1.0),
            stops: Vec::new(),
            absolute: false,
        });
        assert!(fill_paint(&brush, Rect::new(0.0, 0.0, 10.0, 10.0)).is_none());
        assert!(fill_paint(&Brush::solid(Colors::RED), Rect::ZERO).is_some());
    }
}
