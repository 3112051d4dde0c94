//! Drawboard iOS Platform
//!
//! Retained-mode drawing for UIKit custom views. A drawing pass appends one
//! shape or text sublayer per canvas call to the control's container layer,
//! the way a `CAShapeLayer` based view builds its content.
//!
//! Layer model limits:
//! - Arcs in paths are drawn as straight lines to their endpoint
//! - Gradient brushes fill with their first stop's colour
//! - `draw_image` returns [`DrawError::UnsupportedOperation`]
//! - `get_image` returns an empty image
//!
//! Rectangles and ellipses always produce a layer, even without pen or
//! brush; paths without either are skipped.

mod canvas;
pub mod input;
mod layer;
mod surface;

pub use canvas::{path_data, LayerCanvas};
pub use layer::{Bounds, Geometry, Layer, LayerContainer, LayerTree, ShapeLayer, TextLayer};
pub use surface::IosSurface;

use drawboard_graphics::{Canvas, DrawError, DrawResult, GraphicsPlatform, Size};

/// iOS graphics factory
///
/// Images decode through the shared loader; offscreen canvases have no
/// layer-tree equivalent.
#[derive(Debug, Default, Clone, Copy)]
pub struct IosGraphics;

impl GraphicsPlatform for IosGraphics {
    fn name(&self) -> &'static str {
        "ios"
    }

    fn create_image_canvas(
        &self,
        _size: Size,
        _scale: f32,
        _transparent: bool,
    ) -> DrawResult<Box<dyn Canvas>> {
        Err(DrawError::UnsupportedOperation("image canvas on a layer tree"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_graphics::Colors;

    #[test]
    fn test_image_canvas_unsupported() {
        let graphics = IosGraphics;
        assert_eq!(graphics.name(), "ios");
        assert!(matches!(
            graphics.create_image_canvas(Size::new(10.0, 10.0), 1.0, false),
            Err(DrawError::UnsupportedOperation(_))
        ));
        let image = graphics.create_image(&[Colors::RED; 4], 2, 2.0).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }
}
