//! Drawboard Android Platform
//!
//! Immediate-mode drawing for Android custom views. Every canvas operation
//! rasterizes into a tiny-skia bitmap, so gradients, transforms, clipping,
//! image compositing and snapshots all behave like Android's own `Canvas`.
//!
//! - [`AndroidSurface`] - the native control a `ViewRenderer` draws into
//! - [`PixmapCanvas`] - the per-pass raster canvas
//! - [`AndroidGraphics`] - offscreen canvases and image loading
//! - [`input`] - `MotionEvent` to `TouchFrame` conversion
//!
//! Text is laid out one line at a time from glyph outlines found through
//! fontdb. When no face resolves, text drawing is a logged no-op.
//!
//! # Example
//!
//! ```ignore
//! use drawboard_platform_android::{AndroidGraphics, AndroidSurface};
//! use drawboard_view::prelude::*;
//!
//! let graphics = AndroidGraphics::from_config(&config);
//! let surface = graphics.create_surface(&config.surface)?;
//! renderer.attach(surface, node, &touch_frames)?;
//! ```

mod canvas;
pub mod input;
mod paint;
mod surface;
mod text;

pub use canvas::PixmapCanvas;
pub use surface::AndroidSurface;
pub use text::{FontSystem, TextRun};

use std::rc::Rc;

use drawboard_graphics::{Canvas, DrawError, DrawResult, GraphicsPlatform, Size};
use drawboard_view::{DrawboardConfig, SurfaceConfig};
use tiny_skia::Pixmap;
use tracing::debug;

/// Android graphics factory
pub struct AndroidGraphics {
    fonts: Rc<FontSystem>,
}

impl AndroidGraphics {
    pub fn new(fonts: FontSystem) -> Self {
        Self {
            fonts: Rc::new(fonts),
        }
    }

    /// Load fonts according to `[text]` settings
    pub fn from_config(config: &DrawboardConfig) -> Self {
        Self::new(FontSystem::from_config(&config.text))
    }

    pub fn fonts(&self) -> &Rc<FontSystem> {
        &self.fonts
    }

    /// A native surface sharing this platform's fonts
    pub fn create_surface(&self, config: &SurfaceConfig) -> drawboard_platform::Result<AndroidSurface> {
        AndroidSurface::from_config(config, Rc::clone(&self.fonts))
    }
}

impl Default for AndroidGraphics {
    fn default() -> Self {
        Self::new(FontSystem::new())
    }
}

impl GraphicsPlatform for AndroidGraphics {
    fn name(&self) -> &'static str {
        "android"
    }

    fn create_image_canvas(
        &self,
        size: Size,
        scale: f32,
        transparent: bool,
    ) -> DrawResult<Box<dyn Canvas>> {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let (width, height) = surface::pixel_dimensions(size, scale);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            DrawError::Image(format!("cannot allocate {}x{} canvas", width, height))
        })?;
        if !transparent {
            pixmap.fill(tiny_skia::Color::WHITE);
        }
        debug!(width, height, transparent, "image canvas created");
        Ok(Box::new(PixmapCanvas::offscreen(
            pixmap,
            scale,
            Rc::clone(&self.fonts),
        )))
    }
}
