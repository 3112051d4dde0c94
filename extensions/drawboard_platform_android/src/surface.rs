//! Bitmap-backed native surface

use std::rc::Rc;

use drawboard_graphics::{Canvas, Color, Image, Rect, Size};
use drawboard_platform::{PlatformError, Result};
use drawboard_view::{NativeSurface, SurfaceConfig};
use tiny_skia::Pixmap;
use tracing::{debug, trace, warn};

use crate::canvas::{snapshot, PixmapCanvas};
use crate::paint::skia_color;
use crate::text::FontSystem;

/// A custom-drawn Android control: a bitmap redrawn on every pass
pub struct AndroidSurface {
    pixmap: Pixmap,
    scale: f32,
    fonts: Rc<FontSystem>,
    clip: Option<Rect>,
    background: Option<Color>,
    transparent: bool,
    cancel_default_drawing: bool,
}

impl AndroidSurface {
    /// A 1x1 surface; the first pass resizes it to the view
    pub fn new(scale: f32, fonts: Rc<FontSystem>) -> Result<Self> {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Ok(Self {
            pixmap: allocate(Size::new(1.0, 1.0), 1.0)?,
            scale,
            fonts,
            clip: None,
            background: None,
            transparent: false,
            cancel_default_drawing: false,
        })
    }

    /// Surface initialised from `[surface]` settings
    pub fn from_config(config: &SurfaceConfig, fonts: Rc<FontSystem>) -> Result<Self> {
        let mut surface = Self::new(config.scale, fonts)?;
        surface.transparent = config.transparent;
        surface.background = config
            .background_color()
            .map_err(|e| PlatformError::Other(e.to_string()))?;
        Ok(surface)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn cancels_default_drawing(&self) -> bool {
        self.cancel_default_drawing
    }

    /// Pixel dimensions of the backing bitmap
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Copy of the current bitmap contents
    pub fn snapshot(&self) -> Image {
        snapshot(&self.pixmap, self.scale)
    }

    /// PNG encoding of the current bitmap
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| PlatformError::Other(e.to_string()))
    }

    /// The colour a cleared surface shows
    fn clear_color(&self) -> Color {
        if self.transparent || self.cancel_default_drawing {
            return Color::rgba(0, 0, 0, 0);
        }
        self.background.unwrap_or(Color::rgba(0, 0, 0, 0))
    }
}

/// Allocate a pixmap for `size` view units, never smaller than 1x1
fn allocate(size: Size, scale: f32) -> Result<Pixmap> {
    let (width, height) = pixel_dimensions(size, scale);
    Pixmap::new(width, height).ok_or_else(|| {
        PlatformError::SurfaceCreation(format!("cannot allocate {}x{} bitmap", width, height))
    })
}

pub(crate) fn pixel_dimensions(size: Size, scale: f32) -> (u32, u32) {
    let to_pixels = |v: f32| {
        let px = (v * scale).ceil();
        if px.is_finite() && px >= 1.0 {
            px as u32
        } else {
            1
        }
    };
    (to_pixels(size.width), to_pixels(size.height))
}

impl NativeSurface for AndroidSurface {
    fn clear(&mut self) {
        let color = self.clear_color();
        self.pixmap.fill(skia_color(color));
        trace!(?color, "surface cleared");
    }

    fn begin_pass(&mut self, size: Size) -> Box<dyn Canvas + '_> {
        if pixel_dimensions(size, self.scale) != self.pixel_size() {
            match allocate(size, self.scale) {
                Ok(pixmap) => {
                    debug!(
                        width = pixmap.width(),
                        height = pixmap.height(),
                        "surface resized"
                    );
                    self.pixmap = pixmap;
                    self.clear();
                }
                Err(e) => warn!("Keeping old bitmap: {}", e),
            }
        }

        let clip = self.clip;
        let mut canvas = PixmapCanvas::new(&mut self.pixmap, self.scale, Rc::clone(&self.fonts));
        if let Some(clip) = clip {
            canvas.clip_rect(clip);
        }
        Box::new(canvas)
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }

    fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    fn set_cancel_default_drawing(&mut self, cancel: bool) {
        self.cancel_default_drawing = cancel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_graphics::{CanvasExt, Colors};

    fn surface(scale: f32) -> AndroidSurface {
        AndroidSurface::new(scale, Rc::new(FontSystem::new())).unwrap()
    }

    #[test]
    fn test_pass_resizes_bitmap() {
        let mut surface = surface(2.0);
        assert_eq!(surface.pixel_size(), (1, 1));
        {
            let canvas = surface.begin_pass(Size::new(50.0, 25.5));
            assert_eq!(canvas.size(), Size::new(50.0, 25.5));
        }
        assert_eq!(surface.pixel_size(), (100, 51));
    }

    #[test]
    fn test_degenerate_size_keeps_one_pixel() {
        assert_eq!(pixel_dimensions(Size::new(0.0, -1.0), 1.0), (1, 1));
        assert_eq!(pixel_dimensions(Size::new(f32::NAN, 3.2), 1.0), (1, 4));
    }

    #[test]
    fn test_clear_uses_background_unless_transparent() {
        let mut surface = surface(1.0);
        surface.begin_pass(Size::new(4.0, 4.0));
        surface.set_background(Some(Colors::BLUE));
        surface.clear();
        assert_eq!(surface.snapshot().pixel(1, 1), Some(Colors::BLUE));

        surface.set_transparent(true);
        surface.clear();
        assert_eq!(surface.snapshot().pixel(1, 1).map(|c| c.a), Some(0));

        surface.set_transparent(false);
        surface.set_cancel_default_drawing(true);
        surface.clear();
        assert_eq!(surface.snapshot().pixel(1, 1).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_surface_clip_applies_to_pass() {
        let mut surface = surface(1.0);
        surface.set_clip(Some(Rect::new(0.0, 0.0, 5.0, 10.0)));
        {
            let mut canvas = surface.begin_pass(Size::new(10.0, 10.0));
            canvas.fill_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), Colors::RED);
        }
        let image = surface.snapshot();
        assert_eq!(image.pixel(2, 5), Some(Colors::RED));
        assert_eq!(image.pixel(8, 5).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_from_config_rejects_bad_background() {
        let config = SurfaceConfig {
            background: Some("not a colour".into()),
            ..SurfaceConfig::default()
        };
        let result = AndroidSurface::from_config(&config, Rc::new(FontSystem::new()));
        assert!(matches!(result, Err(PlatformError::Other(_))));
    }
}
