//! Image data

use std::io::Cursor;
use std::path::Path;

use crate::color::Color;
use crate::error::{DrawError, DrawResult};
use crate::geometry::Size;

/// Decoded RGBA image (straight alpha, row-major)
///
/// An image may be empty (0×0); surfaces that cannot capture their contents
/// return an empty image from `get_image`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    scale: f32,
}

impl Image {
    /// A well-formed image with no pixels
    pub fn empty() -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            scale: 1.0,
        }
    }

    /// Create an image from raw RGBA pixels
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32, scale: f32) -> DrawResult<Self> {
        let expected_len = width as usize * height as usize * 4;
        if pixels.len() != expected_len {
            return Err(DrawError::Image(format!(
                "Invalid pixel data length: expected {}, got {}",
                expected_len,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            scale: if scale > 0.0 { scale } else { 1.0 },
        })
    }

    /// Create an image from a row-major color array `width` pixels wide
    pub fn from_colors(colors: &[Color], width: u32, scale: f32) -> DrawResult<Self> {
        if width == 0 {
            return if colors.is_empty() {
                Ok(Self::empty())
            } else {
                Err(DrawError::Image("image width must be > 0".into()))
            };
        }
        if colors.len() % width as usize != 0 {
            return Err(DrawError::Image(format!(
                "{} colors do not fill rows of {} pixels",
                colors.len(),
                width
            )));
        }
        let height = (colors.len() / width as usize) as u32;
        let pixels = colors.iter().flat_map(|c| c.to_rgba8()).collect();
        Self::from_rgba(pixels, width, height, scale)
    }

    /// Decode PNG or JPEG bytes
    pub fn decode(bytes: &[u8]) -> DrawResult<Self> {
        let decoded = ::image::load_from_memory(bytes)
            .map_err(|e| DrawError::Image(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba(decoded.into_raw(), width, height, 1.0)
    }

    /// Decode an image file
    pub fn open(path: impl AsRef<Path>) -> DrawResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| DrawError::Image(format!("{}: {}", path.display(), e)))?;
        Self::decode(&bytes)
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> DrawResult<Vec<u8>> {
        if self.is_empty() {
            return Err(DrawError::Image("cannot encode an empty image".into()));
        }
        let buffer = ::image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| DrawError::Image("pixel buffer does not match dimensions".into()))?;
        let mut out = Cursor::new(Vec::new());
        buffer
            .write_to(&mut out, ::image::ImageFormat::Png)
            .map_err(|e| DrawError::Image(e.to_string()))?;
        Ok(out.into_inner())
    }

    /// Encode as PNG and write to `path`
    pub fn save_png(&self, path: impl AsRef<Path>) -> DrawResult<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)
            .map_err(|e| DrawError::Image(format!("{}: {}", path.display(), e)))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Size in view units (pixels divided by scale)
    pub fn size(&self) -> Size {
        Size::new(
            self.width as f32 / self.scale,
            self.height as f32 / self.scale,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}
