//! Drawing surface abstraction
//!
//! A [`Canvas`] is bound to one native surface for the length of a single
//! redraw pass. Views describe what to paint by issuing operations against
//! `&mut dyn Canvas`; each platform decides how those operations become native
//! elements or pixels.
//!
//! Surfaces differ in capability. Operations a surface cannot express either
//! degrade (logged, never raised) or, for [`Canvas::draw_image`], return
//! [`DrawError::UnsupportedOperation`](crate::DrawError::UnsupportedOperation).

use crate::brush::{Brush, Pen};
use crate::color::Color;
use crate::error::DrawResult;
use crate::geometry::{Point, Rect, Size};
use crate::image::Image;
use crate::path::{PathBuilder, PathOp};
use crate::text::{Font, TextAlignment};
use crate::transform::Transform;

/// Device-independent 2D drawing surface
pub trait Canvas {
    // ─────────────────────────────────────────────────────────────────────────
    // Capabilities
    // ─────────────────────────────────────────────────────────────────────────

    /// Drawable size in view units
    fn size(&self) -> Size;

    /// Device pixels per view unit
    fn scale(&self) -> f32;

    // ─────────────────────────────────────────────────────────────────────────
    // State Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push the current transform and clip
    fn save_state(&mut self);

    /// Pop the most recently saved transform and clip
    ///
    /// Ignored when nothing has been saved.
    fn restore_state(&mut self);

    /// Compose `transform` onto the current transform
    fn transform(&mut self, transform: Transform);

    /// Intersect the current clip with `rect` (local coordinates)
    fn clip_rect(&mut self, rect: Rect);

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill and/or stroke a path
    ///
    /// Does nothing when both `pen` and `brush` are `None`, and drops (with a
    /// warning) paths that are empty or do not begin with `MoveTo`.
    fn draw_path(&mut self, ops: &[PathOp], pen: Option<&Pen>, brush: Option<&Brush>);

    fn draw_rectangle(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>);

    fn draw_ellipse(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>);

    /// Composite `image` scaled into `frame` with the given opacity
    fn draw_image(&mut self, image: &Image, frame: Rect, alpha: f32) -> DrawResult<()>;

    /// Draw a single line of text inside `frame`
    ///
    /// The brush fills glyphs; with no brush the pen colour is used.
    fn draw_text(
        &mut self,
        text: &str,
        frame: Rect,
        font: &Font,
        alignment: TextAlignment,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    );

    /// Snapshot the surface contents
    ///
    /// Surfaces that cannot read back return an empty image.
    fn get_image(&self) -> Image;
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn scale(&self) -> f32 {
        (**self).scale()
    }

    fn save_state(&mut self) {
        (**self).save_state()
    }

    fn restore_state(&mut self) {
        (**self).restore_state()
    }

    fn transform(&mut self, transform: Transform) {
        (**self).transform(transform)
    }

    fn clip_rect(&mut self, rect: Rect) {
        (**self).clip_rect(rect)
    }

    fn draw_path(&mut self, ops: &[PathOp], pen: Option<&Pen>, brush: Option<&Brush>) {
        (**self).draw_path(ops, pen, brush)
    }

    fn draw_rectangle(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        (**self).draw_rectangle(frame, pen, brush)
    }

    fn draw_ellipse(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        (**self).draw_ellipse(frame, pen, brush)
    }

    fn draw_image(&mut self, image: &Image, frame: Rect, alpha: f32) -> DrawResult<()> {
        (**self).draw_image(image, frame, alpha)
    }

    fn draw_text(
        &mut self,
        text: &str,
        frame: Rect,
        font: &Font,
        alignment: TextAlignment,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) {
        (**self).draw_text(text, frame, font, alignment, pen, brush)
    }

    fn get_image(&self) -> Image {
        (**self).get_image()
    }
}

/// Convenience drawing methods for any [`Canvas`]
pub trait CanvasExt: Canvas {
    /// Stroke a single line segment
    fn draw_line(&mut self, from: Point, to: Point, pen: &Pen) {
        let ops = [PathOp::MoveTo(from), PathOp::LineTo(to)];
        self.draw_path(&ops, Some(pen), None);
    }

    fn fill_rectangle(&mut self, frame: Rect, color: Color) {
        self.draw_rectangle(frame, None, Some(&Brush::solid(color)));
    }

    fn stroke_rectangle(&mut self, frame: Rect, pen: &Pen) {
        self.draw_rectangle(frame, Some(pen), None);
    }

    fn fill_ellipse(&mut self, frame: Rect, color: Color) {
        self.draw_ellipse(frame, None, Some(&Brush::solid(color)));
    }

    /// Closed polygon through `points`; fewer than two points draws nothing
    fn draw_polygon(&mut self, points: &[Point], pen: Option<&Pen>, brush: Option<&Brush>) {
        if points.len() < 2 {
            return;
        }
        let ops = PathBuilder::polygon(points).build();
        self.draw_path(&ops, pen, brush);
    }
}

impl<T: Canvas + ?Sized> CanvasExt for T {}
