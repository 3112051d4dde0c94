//! Raster canvas
//!
//! [`PixmapCanvas`] rasterizes every drawing operation straight into a
//! tiny-skia pixmap, the way an Android `Canvas` draws into its bitmap.
//! Transforms, clipping, gradients and image compositing are all real; the
//! surface scale is folded into the base transform so views draw in view
//! units.

use std::rc::Rc;

use drawboard_graphics::path::{self, PathOp};
use drawboard_graphics::{
    Brush, Canvas, DrawResult, Font, Image, Pen, Rect, Size, StateStack, TextAlignment, Transform,
};
use tiny_skia::{FillRule, FilterQuality, Mask, Pixmap, PixmapPaint};
use tracing::{debug, trace, warn};

use crate::paint::{build_path, ellipse_path, fill_paint, rect_path, skia_transform, stroke_paint};
use crate::text::FontSystem;

enum Target<'a> {
    Borrowed(&'a mut Pixmap),
    Owned(Pixmap),
}

impl Target<'_> {
    fn pixmap(&self) -> &Pixmap {
        match self {
            Target::Borrowed(pixmap) => pixmap,
            Target::Owned(pixmap) => pixmap,
        }
    }

    fn pixmap_mut(&mut self) -> &mut Pixmap {
        match self {
            Target::Borrowed(pixmap) => pixmap,
            Target::Owned(pixmap) => pixmap,
        }
    }
}

/// Canvas that draws into a tiny-skia [`Pixmap`]
pub struct PixmapCanvas<'a> {
    target: Target<'a>,
    fonts: Rc<FontSystem>,
    state: StateStack,
    size: Size,
    scale: f32,
    /// Mask for the current clip, keyed by the clip it was built for
    mask: Option<(Rect, Mask)>,
}

impl<'a> PixmapCanvas<'a> {
    /// Draw into a pixmap owned by a native surface
    pub fn new(pixmap: &'a mut Pixmap, scale: f32, fonts: Rc<FontSystem>) -> Self {
        Self::with_target(Target::Borrowed(pixmap), scale, fonts)
    }

    fn with_target(target: Target<'a>, scale: f32, fonts: Rc<FontSystem>) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let pixmap = target.pixmap();
        let size = Size::new(
            pixmap.width() as f32 / scale,
            pixmap.height() as f32 / scale,
        );
        Self {
            target,
            fonts,
            state: StateStack::with_base(Transform::scale(scale, scale)),
            size,
            scale,
            mask: None,
        }
    }

    /// Pixels drawn so far
    pub fn pixmap(&self) -> &Pixmap {
        self.target.pixmap()
    }

    /// Bring the cached clip mask in line with the current clip
    ///
    /// Returns `false` when the clip is empty and nothing can be drawn.
    fn update_mask(&mut self) -> bool {
        let Some(clip) = self.state.clip() else {
            self.mask = None;
            return true;
        };
        if clip.is_empty() {
            return false;
        }
        if self.mask.as_ref().map(|(rect, _)| *rect) != Some(clip) {
            let pixmap = self.target.pixmap();
            self.mask = build_mask(clip, pixmap.width(), pixmap.height()).map(|mask| (clip, mask));
            if self.mask.is_none() {
                warn!("Failed to build clip mask for {:?}", clip);
            }
        }
        true
    }

    /// Fill and stroke a prepared path; `bounds` resolves relative gradients
    fn paint_path(
        &mut self,
        path: &tiny_skia::Path,
        bounds: Rect,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
        local: Transform,
    ) {
        if !self.update_mask() {
            trace!("skipping draw outside clip");
            return;
        }
        let transform = skia_transform(&self.state.transform().multiply(&local));
        let mask = self.mask.as_ref().map(|(_, mask)| mask);
        let pixmap = self.target.pixmap_mut();

        if let Some(brush) = brush {
            match fill_paint(brush, bounds) {
                Some(paint) => pixmap.fill_path(path, &paint, FillRule::Winding, transform, mask),
                None => debug!("Brush produced no paint, fill skipped"),
            }
        }
        if let Some((paint, stroke)) = pen.and_then(stroke_paint) {
            pixmap.stroke_path(path, &paint, &stroke, transform, mask);
        }
    }

    fn draw_shape(
        &mut self,
        shape: Option<tiny_skia::Path>,
        frame: Rect,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) {
        if pen.is_none() && brush.is_none() {
            return;
        }
        match shape {
            Some(path) => self.paint_path(&path, frame, pen, brush, Transform::IDENTITY),
            None => trace!("degenerate shape {:?} skipped", frame),
        }
    }
}

impl PixmapCanvas<'static> {
    /// An offscreen canvas owning its pixmap
    pub fn offscreen(pixmap: Pixmap, scale: f32, fonts: Rc<FontSystem>) -> Self {
        Self::with_target(Target::Owned(pixmap), scale, fonts)
    }
}

fn build_mask(clip: Rect, width: u32, height: u32) -> Option<Mask> {
    let mut mask = Mask::new(width, height)?;
    let path = rect_path(clip)?;
    mask.fill_path(&path, FillRule::Winding, true, tiny_skia::Transform::identity());
    Some(mask)
}

impl Canvas for PixmapCanvas<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn save_state(&mut self) {
        self.state.save();
    }

    fn restore_state(&mut self) {
        if !self.state.restore() {
            trace!("restore_state without matching save ignored");
        }
    }

    fn transform(&mut self, transform: Transform) {
        self.state.concat(&transform);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
    }

    fn draw_path(&mut self, ops: &[PathOp], pen: Option<&Pen>, brush: Option<&Brush>) {
        if pen.is_none() && brush.is_none() {
            return;
        }
        if let Err(e) = path::validate(ops) {
            warn!("Dropping path: {}", e);
            return;
        }
        let Some(skia_path) = build_path(ops) else {
            trace!("path has no drawable segments");
            return;
        };
        let bounds = path::bounds(ops).unwrap_or(Rect::ZERO);
        self.paint_path(&skia_path, bounds, pen, brush, Transform::IDENTITY);
    }

    fn draw_rectangle(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        self.draw_shape(rect_path(frame), frame, pen, brush);
    }

    fn draw_ellipse(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        self.draw_shape(ellipse_path(frame), frame, pen, brush);
    }

    fn draw_image(&mut self, image: &Image, frame: Rect, alpha: f32) -> DrawResult<()> {
        if image.is_empty() || frame.is_empty() {
            return Ok(());
        }
        let Some(source) = premultiplied_pixmap(image) else {
            warn!("Image {}x{} could not be converted", image.width(), image.height());
            return Ok(());
        };
        if !self.update_mask() {
            return Ok(());
        }

        let local = Transform::translate(frame.x, frame.y).multiply(&Transform::scale(
            frame.width / image.width() as f32,
            frame.height / image.height() as f32,
        ));
        let transform = skia_transform(&self.state.transform().multiply(&local));
        let paint = PixmapPaint {
            opacity: alpha.clamp(0.0, 1.0),
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let mask = self.mask.as_ref().map(|(_, mask)| mask);
        self.target
            .pixmap_mut()
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, mask);
        Ok(())
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
        if text.is_empty() || (pen.is_none() && brush.is_none()) {
            return;
        }
        let Some(mut run) = self.fonts.layout(text, font, 0.0) else {
            debug!("No font face for {:?}, text not drawn", font.family);
            return;
        };
        if alignment == TextAlignment::Justified && run.spaces > 0 && run.width < frame.width {
            let spacing = (frame.width - run.width) / run.spaces as f32;
            if let Some(justified) = self.fonts.layout(text, font, spacing) {
                run = justified;
            }
        }
        let Some(glyphs) = run.path.as_ref() else {
            return;
        };

        let (x, baseline) = run.origin(frame, alignment);
        // Glyphs fill with the brush, or with the pen colour when there is none
        let fill = brush.cloned().or_else(|| pen.map(|p| Brush::solid(p.color)));
        let outline = if brush.is_some() { pen } else { None };
        self.paint_path(
            glyphs,
            frame,
            outline,
            fill.as_ref(),
            Transform::translate(x, baseline),
        );
    }

    fn get_image(&self) -> Image {
        snapshot(self.target.pixmap(), self.scale)
    }
}

/// Convert straight-alpha image pixels into a premultiplied pixmap
pub(crate) fn premultiplied_pixmap(image: &Image) -> Option<Pixmap> {
    let data = image
        .pixels()
        .chunks_exact(4)
        .flat_map(|px| {
            let c = tiny_skia::ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let size = tiny_skia::IntSize::from_wh(image.width(), image.height())?;
    Pixmap::from_vec(data, size)
}

/// Copy a pixmap into a straight-alpha image
pub(crate) fn snapshot(pixmap: &Pixmap, scale: f32) -> Image {
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Image::from_rgba(pixels, pixmap.width(), pixmap.height(), scale).unwrap_or_else(|e| {
        warn!("Snapshot failed: {}", e);
        Image::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_graphics::{CanvasExt, Colors, Point};

    fn offscreen(width: u32, height: u32, scale: f32) -> PixmapCanvas<'static> {
        let pixmap = Pixmap::new(width, height).unwrap();
        PixmapCanvas::offscreen(pixmap, scale, Rc::new(FontSystem::new()))
    }

    #[test]
    fn test_filled_rect_snapshot() {
        let mut canvas = offscreen(100, 60, 1.0);
        canvas.draw_rectangle(
            Rect::new(10.0, 10.0, 50.0, 30.0),
            None,
            Some(&Brush::solid(Colors::RED)),
        );
        let image = canvas.get_image();
        assert_eq!((image.width(), image.height()), (100, 60));
        assert_eq!(image.pixel(30, 20), Some(Colors::RED));
        assert_eq!(image.pixel(5, 5).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_scale_maps_view_units_to_pixels() {
        let mut canvas = offscreen(40, 40, 2.0);
        assert_eq!(canvas.size(), Size::new(20.0, 20.0));
        canvas.fill_rectangle(Rect::new(10.0, 10.0, 10.0, 10.0), Colors::BLUE);
        let image = canvas.get_image();
        assert_eq!(image.pixel(30, 30), Some(Colors::BLUE));
        assert_eq!(image.pixel(15, 15).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_transform_and_restore() {
        let mut canvas = offscreen(50, 50, 1.0);
        canvas.save_state();
        canvas.transform(Transform::translate(30.0, 30.0));
        canvas.fill_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), Colors::GREEN);
        canvas.restore_state();
        canvas.restore_state();
        canvas.fill_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), Colors::RED);

        let image = canvas.get_image();
        assert_eq!(image.pixel(35, 35), Some(Colors::GREEN));
        assert_eq!(image.pixel(5, 5), Some(Colors::RED));
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut canvas = offscreen(50, 50, 1.0);
        canvas.clip_rect(Rect::new(0.0, 0.0, 20.0, 50.0));
        canvas.fill_rectangle(Rect::new(0.0, 0.0, 50.0, 50.0), Colors::RED);

        let image = canvas.get_image();
        assert_eq!(image.pixel(10, 10), Some(Colors::RED));
        assert_eq!(image.pixel(30, 10).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_no_pen_no_brush_draws_nothing() {
        let mut canvas = offscreen(20, 20, 1.0);
        canvas.draw_rectangle(Rect::new(0.0, 0.0, 20.0, 20.0), None, None);
        canvas.draw_path(
            &[PathOp::MoveTo(Point::ZERO), PathOp::LineTo(Point::new(20.0, 20.0))],
            None,
            None,
        );
        assert!(canvas.get_image().pixels().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_gradient_fill_varies() {
        let mut canvas = offscreen(10, 100, 1.0);
        canvas.draw_rectangle(
            Rect::new(0.0, 0.0, 10.0, 100.0),
            None,
            Some(&Brush::vertical_gradient(Colors::WHITE, Colors::BLACK)),
        );
        let image = canvas.get_image();
        let top = image.pixel(5, 1).unwrap();
        let bottom = image.pixel(5, 98).unwrap();
        assert!(top.r > 240);
        assert!(bottom.r < 15);
    }

    #[test]
    fn test_draw_image_with_alpha() {
        let source = Image::from_colors(&[Colors::BLUE; 4], 2, 1.0).unwrap();
        let mut canvas = offscreen(10, 10, 1.0);
        canvas
            .draw_image(&source, Rect::new(0.0, 0.0, 10.0, 10.0), 1.0)
            .unwrap();
        assert_eq!(canvas.get_image().pixel(5, 5), Some(Colors::BLUE));

        let mut faded = offscreen(10, 10, 1.0);
        faded
            .draw_image(&source, Rect::new(0.0, 0.0, 10.0, 10.0), 0.5)
            .unwrap();
        let alpha = faded.get_image().pixel(5, 5).unwrap().a;
        assert!((120..=135).contains(&alpha));
    }

    #[test]
    fn test_text_without_fonts_is_noop() {
        let mut canvas = offscreen(50, 20, 1.0);
        canvas.draw_text(
            "Hello",
            Rect::new(0.0, 0.0, 50.0, 20.0),
            &Font::default(),
            TextAlignment::Left,
            None,
            Some(&Brush::solid(Colors::BLACK)),
        );
        assert!(canvas.get_image().pixels().iter().all(|b| *b == 0));
    }
}
