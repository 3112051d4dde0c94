//! Drawboard Graphics
//!
//! A device-independent description of 2D drawing, translated by platform
//! surfaces into native draw calls.
//!
//! # Features
//!
//! - Paths built from move/line/arc/curve segments
//! - Solid, linear-gradient and radial-gradient brushes
//! - Stroking pens
//! - Text frames with alignment
//! - RGBA images with PNG/JPEG decoding
//! - A save/restore transform and clip stack
//!
//! # Example
//!
//! ```rust
//! use drawboard_graphics::prelude::*;
//!
//! let mut canvas = RecordingCanvas::new(Size::new(200.0, 100.0));
//!
//! canvas.save_state();
//! canvas.transform(Transform::translate(10.0, 10.0));
//! canvas.draw_rectangle(
//!     Rect::new(0.0, 0.0, 50.0, 30.0),
//!     None,
//!     Some(&Brush::solid(Colors::RED)),
//! );
//! canvas.restore_state();
//!
//! let path = PathBuilder::new()
//!     .move_to(0.0, 0.0)
//!     .line_to(100.0, 0.0)
//!     .curve_to(120.0, 10.0, 120.0, 40.0, 100.0, 50.0)
//!     .close()
//!     .build();
//! canvas.draw_path(&path, Some(&Pen::new(Colors::BLACK, 1.0)), None);
//!
//! assert_eq!(canvas.commands().len(), 5);
//! ```

pub mod brush;
pub mod canvas;
pub mod color;
pub mod error;
pub mod geometry;
pub mod image;
pub mod path;
pub mod platform;
pub mod recording;
pub mod state;
pub mod text;
pub mod transform;

pub use brush::{Brush, GradientStop, LinearGradientBrush, Pen, RadialGradientBrush, SolidBrush};
pub use canvas::{Canvas, CanvasExt};
pub use color::{Color, Colors};
pub use error::{DrawError, DrawResult};
pub use geometry::{Point, Rect, Size};
pub use image::Image;
pub use path::{PathBuilder, PathOp};
pub use platform::GraphicsPlatform;
pub use recording::{DrawCommand, RecordingCanvas};
pub use state::{CanvasState, StateStack};
pub use text::{Font, TextAlignment};
pub use transform::Transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::brush::{
        Brush, GradientStop, LinearGradientBrush, Pen, RadialGradientBrush, SolidBrush,
    };
    pub use crate::canvas::{Canvas, CanvasExt};
    pub use crate::color::{Color, Colors};
    pub use crate::error::{DrawError, DrawResult};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::image::Image;
    pub use crate::path::{PathBuilder, PathOp};
    pub use crate::recording::{DrawCommand, RecordingCanvas};
    pub use crate::text::{Font, TextAlignment};
    pub use crate::transform::Transform;
}
