//! Brushes (fills) and pens (strokes)

use crate::color::Color;
use crate::geometry::{Point, Rect};

/// A gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Single-color fill
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidBrush {
    pub color: Color,
}

/// Linear gradient between two points
///
/// Points are relative to the filled shape's bounding box (0.0 to 1.0) unless
/// `absolute` is set, in which case they are in local view coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradientBrush {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
    pub absolute: bool,
}

/// Radial gradient
///
/// `center`, `focus` and `radius` follow the same relative/absolute rule as
/// [`LinearGradientBrush`]. A relative radius is a fraction of the bounding
/// box's larger side.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradientBrush {
    pub center: Point,
    pub focus: Point,
    pub radius: f32,
    pub stops: Vec<GradientStop>,
    pub absolute: bool,
}

/// Fill style
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(SolidBrush),
    LinearGradient(LinearGradientBrush),
    RadialGradient(RadialGradientBrush),
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Brush::Solid(SolidBrush { color })
    }

    /// Vertical two-color gradient across the shape's bounds
    pub fn vertical_gradient(top: Color, bottom: Color) -> Self {
        Brush::LinearGradient(LinearGradientBrush {
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, 1.0),
            stops: vec![GradientStop::new(0.0, top), GradientStop::new(1.0, bottom)],
            absolute: false,
        })
    }

    /// Two-color radial gradient centered in the shape's bounds
    pub fn radial_gradient(center: Color, edge: Color) -> Self {
        Brush::RadialGradient(RadialGradientBrush {
            center: Point::new(0.5, 0.5),
            focus: Point::new(0.5, 0.5),
            radius: 0.5,
            stops: vec![GradientStop::new(0.0, center), GradientStop::new(1.0, edge)],
            absolute: false,
        })
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Brush::Solid(_))
    }

    /// Color used where only flat fills are available
    ///
    /// Gradients collapse to their first stop, or transparent without stops.
    pub fn approximate_color(&self) -> Color {
        match self {
            Brush::Solid(solid) => solid.color,
            Brush::LinearGradient(LinearGradientBrush { stops, .. })
            | Brush::RadialGradient(RadialGradientBrush { stops, .. }) => stops
                .first()
                .map(|s| s.color)
                .unwrap_or(crate::color::Colors::CLEAR),
        }
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::solid(color)
    }
}

impl LinearGradientBrush {
    /// Start and end points resolved against the filled bounds
    pub fn resolve(&self, bounds: Rect) -> (Point, Point) {
        if self.absolute {
            (self.start, self.end)
        } else {
            (relative_point(bounds, self.start), relative_point(bounds, self.end))
        }
    }
}

impl RadialGradientBrush {
    /// Center, focus and radius resolved against the filled bounds
    pub fn resolve(&self, bounds: Rect) -> (Point, Point, f32) {
        if self.absolute {
            (self.center, self.focus, self.radius)
        } else {
            (
                relative_point(bounds, self.center),
                relative_point(bounds, self.focus),
                self.radius * bounds.width.max(bounds.height),
            )
        }
    }
}

fn relative_point(bounds: Rect, p: Point) -> Point {
    Point::new(bounds.x + p.x * bounds.width, bounds.y + p.y * bounds.height)
}

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    /// Stroke width in view units
    pub width: f32,
}

impl Pen {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: crate::color::Colors::BLACK,
            width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colors;

    #[test]
    fn test_relative_gradient_resolution() {
        let Brush::LinearGradient(linear) = Brush::vertical_gradient(Colors::WHITE, Colors::BLACK)
        else {
            panic!("expected linear gradient");
        };
        let (start, end) = linear.resolve(Rect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(start, Point::new(10.0, 20.0));
        assert_eq!(end, Point::new(10.0, 70.0));
    }

    #[test]
    fn test_radial_radius_uses_larger_side() {
        let Brush::RadialGradient(radial) = Brush::radial_gradient(Colors::WHITE, Colors::BLACK)
        else {
            panic!("expected radial gradient");
        };
        let (center, _, radius) = radial.resolve(Rect::new(0.0, 0.0, 40.0, 100.0));
        assert_eq!(center, Point::new(20.0, 50.0));
        assert_eq!(radius, 50.0);
    }

    #[test]
    fn test_approximate_color() {
        assert_eq!(Brush::solid(Colors::RED).approximate_color(), Colors::RED);
        assert_eq!(
            Brush::vertical_gradient(Colors::BLUE, Colors::RED).approximate_color(),
            Colors::BLUE
        );
    }
}
