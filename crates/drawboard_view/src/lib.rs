//! Drawboard View Layer
//!
//! Connects cross-platform custom-drawn views to native controls.
//!
//! - [`DrawingView`] - a view that paints onto a [`Canvas`](drawboard_graphics::Canvas)
//!   and receives touches
//! - [`ViewState`] - bindable properties plus invalidate/property-change streams
//! - [`NativeSurface`] - the native control a renderer draws into
//! - [`ViewRenderer`] - owns the redraw pass, property sync and touch routing
//! - [`DrawboardConfig`] - `drawboard.toml` settings
//!
//! # Example
//!
//! ```ignore
//! use drawboard_view::prelude::*;
//!
//! let view = Rc::new(FnView::new(|canvas, frame| {
//!     canvas.fill_ellipse(frame, Colors::RED);
//! }));
//!
//! let renderer = ViewRenderer::with_router(config.touch.router());
//! renderer.set_view(Some(view.clone()))?;
//! renderer.attach(platform_surface, native_node, &touch_frames)?;
//!
//! // Later: ask for a repaint
//! view.state().invalidate();
//! ```

pub mod config;
mod error;
mod renderer;
mod surface;
mod view;

pub use config::{DrawboardConfig, SurfaceConfig, TextConfig, TouchConfig};
pub use error::{Result, ViewError};
pub use renderer::{RedrawOutcome, ViewRenderer};
pub use surface::NativeSurface;
pub use view::{
    DrawFn, DrawingView, FnView, Invalidator, Property, TouchFn, ViewProperties, ViewState,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::DrawboardConfig;
    pub use crate::error::{Result, ViewError};
    pub use crate::renderer::{RedrawOutcome, ViewRenderer};
    pub use crate::surface::NativeSurface;
    pub use crate::view::{DrawingView, FnView, Property, ViewProperties, ViewState};
    pub use drawboard_graphics::prelude::*;
    pub use drawboard_platform::prelude::*;
}
