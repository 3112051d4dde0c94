//! Per-platform graphics factory

use std::path::Path;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::DrawResult;
use crate::geometry::Size;
use crate::image::Image;

/// Offscreen canvases and image creation for one platform
pub trait GraphicsPlatform {
    /// Short platform name for logs
    fn name(&self) -> &'static str;

    /// Create an offscreen canvas of `size` view units at `scale`
    ///
    /// When `transparent` is false the canvas starts opaque white.
    fn create_image_canvas(
        &self,
        size: Size,
        scale: f32,
        transparent: bool,
    ) -> DrawResult<Box<dyn Canvas>>;

    /// Build an image from row-major colours `width` pixels wide
    fn create_image(&self, colors: &[Color], width: u32, scale: f32) -> DrawResult<Image> {
        Image::from_colors(colors, width, scale)
    }

    /// Decode PNG or JPEG bytes
    fn load_image(&self, bytes: &[u8]) -> DrawResult<Image> {
        Image::decode(bytes)
    }

    fn load_image_file(&self, path: &Path) -> DrawResult<Image> {
        Image::open(path)
    }
}
