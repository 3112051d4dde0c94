//! Drawboard Platform Abstraction Layer
//!
//! Platform-agnostic types for touch input and the native view hierarchy,
//! plus the router that maps native multi-touch frames onto a view's gesture
//! callbacks.
//!
//! # Architecture
//!
//! - [`EventSource`] - a native notification stream with owned [`Subscription`]s
//! - [`VisualNode`] - parent/offset/size access to the native view tree
//! - [`TouchRouter`] - hit-tests frames against a view and dispatches to a
//!   [`TouchTarget`]
//!
//! # Platform Implementations
//!
//! - `drawboard_platform_android` - raster canvas and MotionEvent conversion
//! - `drawboard_platform_ios` - layer-tree canvas and UITouch conversion
//!
//! # Example
//!
//! ```rust
//! use drawboard_platform::prelude::*;
//! use drawboard_graphics::{Rect, Size};
//!
//! struct Logger;
//! impl TouchTarget for Logger {
//!     fn touches_began(&self, touches: &[TouchPoint]) -> bool {
//!         !touches.is_empty()
//!     }
//! }
//!
//! let page = ViewNode::root(Size::new(320.0, 480.0));
//! let view = ViewNode::child(page, Rect::new(20.0, 20.0, 100.0, 100.0));
//!
//! let mut router = TouchRouter::new();
//! let frame = TouchFrame::single(TouchPoint::new(1, 50.0, 50.0, TouchPhase::Began));
//! let outcome = router.route(&frame, view.as_ref(), &Logger);
//! assert_eq!(
//!     outcome,
//!     RouteOutcome::Dispatched { phase: TouchPhase::Began, handled: true }
//! );
//! ```

mod error;
mod event;
mod hierarchy;
mod input;
mod router;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{EventSource, SubscriberId, Subscription, TouchFrameSource};
pub use hierarchy::{page_origin, page_rect, ViewNode, VisualNode};
pub use input::{TouchAction, TouchCoordinates, TouchFrame, TouchPhase, TouchPoint};
pub use router::{RouteOutcome, TouchRouter, TouchSession, TouchTarget};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{EventSource, Subscription, TouchFrameSource};
    pub use crate::hierarchy::{ViewNode, VisualNode};
    pub use crate::input::{TouchAction, TouchCoordinates, TouchFrame, TouchPhase, TouchPoint};
    pub use crate::router::{RouteOutcome, TouchRouter, TouchSession, TouchTarget};
}
