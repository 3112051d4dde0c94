//! Touch routing
//!
//! [`TouchRouter`] filters the platform-wide touch stream down to the frames
//! that land on one view and forwards them to that view's gesture handlers.
//!
//! For each frame:
//!
//! 1. The view's on-page rectangle is resolved by walking its parent chain to
//!    the root page. Unrooted views receive nothing.
//! 2. The primary touch is tested against that rectangle (edges inclusive).
//! 3. Frames whose primary touch is inside are dispatched to the callback
//!    matching the primary touch's phase, with every concurrent touch
//!    translated into the configured coordinate space.
//!
//! Frames outside the view neither dispatch nor change the session state.

use drawboard_graphics::Rect;
use tracing::trace;

use crate::hierarchy::{page_rect, VisualNode};
use crate::input::{TouchCoordinates, TouchFrame, TouchPhase, TouchPoint};

/// Receiver of routed touches
///
/// Each callback returns whether the touches were handled.
pub trait TouchTarget {
    fn touches_began(&self, _touches: &[TouchPoint]) -> bool {
        false
    }

    fn touches_moved(&self, _touches: &[TouchPoint]) -> bool {
        false
    }

    fn touches_ended(&self, _touches: &[TouchPoint]) -> bool {
        false
    }

    fn touches_cancelled(&self, _touches: &[TouchPoint]) -> bool {
        false
    }
}

/// Gesture session state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchSession {
    #[default]
    Idle,
    Began,
    Moved,
}

/// What happened to a routed frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The view is not attached to a root page
    Unrooted,
    /// The primary touch fell outside the view
    Outside,
    /// Delivered to the target
    Dispatched { phase: TouchPhase, handled: bool },
}

/// Routes touch frames to one view
#[derive(Clone, Debug)]
pub struct TouchRouter {
    coordinates: TouchCoordinates,
    multi_touch: bool,
    session: TouchSession,
}

impl TouchRouter {
    pub fn new() -> Self {
        Self {
            coordinates: TouchCoordinates::Local,
            multi_touch: true,
            session: TouchSession::Idle,
        }
    }

    /// Set the coordinate space touches are delivered in
    pub fn with_coordinates(mut self, coordinates: TouchCoordinates) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// When disabled only the primary touch is forwarded
    pub fn with_multi_touch(mut self, multi_touch: bool) -> Self {
        self.multi_touch = multi_touch;
        self
    }

    pub fn session(&self) -> TouchSession {
        self.session
    }

    /// Forget any in-progress gesture
    pub fn reset(&mut self) {
        self.session = TouchSession::Idle;
    }

    /// Route one frame for the view backed by `node`
    pub fn route<T: TouchTarget + ?Sized>(
        &mut self,
        frame: &TouchFrame,
        node: &dyn VisualNode,
        target: &T,
    ) -> RouteOutcome {
        let Some(bounds) = page_rect(node) else {
            trace!("touch frame ignored: view is not rooted");
            return RouteOutcome::Unrooted;
        };

        let primary = frame.primary();
        if !bounds.contains(primary.position) {
            return RouteOutcome::Outside;
        }

        let touches = self.convert(frame, bounds);
        let phase = primary.phase;
        let handled = match phase {
            TouchPhase::Began => target.touches_began(&touches),
            TouchPhase::Moved => target.touches_moved(&touches),
            TouchPhase::Ended => target.touches_ended(&touches),
            TouchPhase::Cancelled => target.touches_cancelled(&touches),
        };

        self.session = match (self.session, phase) {
            (_, TouchPhase::Began) => TouchSession::Began,
            (TouchSession::Idle, TouchPhase::Moved) => {
                trace!("move without a preceding began");
                TouchSession::Moved
            }
            (_, TouchPhase::Moved) => TouchSession::Moved,
            (_, TouchPhase::Ended | TouchPhase::Cancelled) => TouchSession::Idle,
        };

        trace!(?phase, touches = touches.len(), handled, "touch frame dispatched");
        RouteOutcome::Dispatched { phase, handled }
    }

    fn convert(&self, frame: &TouchFrame, bounds: Rect) -> Vec<TouchPoint> {
        let (dx, dy) = match self.coordinates {
            TouchCoordinates::Local => (-bounds.x, -bounds.y),
            TouchCoordinates::Page => (0.0, 0.0),
        };
        if self.multi_touch {
            frame.points().iter().map(|t| t.offset(dx, dy)).collect()
        } else {
            vec![frame.primary().offset(dx, dy)]
        }
    }
}

impl Default for TouchRouter {
    fn default() -> Self {
        Self::new()
    }
}
