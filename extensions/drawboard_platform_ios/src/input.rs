//! UITouch conversion
//!
//! UIKit delivers the set of touches for an event along with the touch that
//! triggered the callback. Positions are already in points.

use drawboard_platform::{PlatformError, Result, TouchFrame, TouchPhase, TouchPoint};

/// Raw `UITouchPhase` values
pub mod phase {
    pub const BEGAN: i64 = 0;
    pub const MOVED: i64 = 1;
    pub const STATIONARY: i64 = 2;
    pub const ENDED: i64 = 3;
    pub const CANCELLED: i64 = 4;
}

/// Map a `UITouchPhase`; stationary touches count as moved
pub fn phase_from_raw(raw: i64) -> Result<TouchPhase> {
    match raw {
        phase::BEGAN => Ok(TouchPhase::Began),
        phase::MOVED | phase::STATIONARY => Ok(TouchPhase::Moved),
        phase::ENDED => Ok(TouchPhase::Ended),
        phase::CANCELLED => Ok(TouchPhase::Cancelled),
        // Pencil and hover phases are not touches
        _ => Err(PlatformError::UnknownTouchAction(raw as i32)),
    }
}

/// One `UITouch` as read from the event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NativeTouch {
    /// Stable identity of the touch object for the gesture's lifetime
    pub identity: u64,
    pub x: f32,
    pub y: f32,
    pub phase: i64,
}

impl NativeTouch {
    pub fn new(identity: u64, x: f32, y: f32, phase: i64) -> Self {
        Self { identity, x, y, phase }
    }
}

/// Build a touch frame; `primary` is the identity of the touch that started
/// the gesture, so extra fingers arrive as moves of the ongoing session
pub fn frame_from_touches(touches: &[NativeTouch], primary: u64) -> Result<TouchFrame> {
    let points = touches
        .iter()
        .map(|t| Ok(TouchPoint::new(t.identity, t.x, t.y, phase_from_raw(t.phase)?)))
        .collect::<Result<Vec<_>>>()?;
    let index = touches
        .iter()
        .position(|t| t.identity == primary)
        .ok_or_else(|| PlatformError::Other(format!("primary touch {} not in event", primary)))?;
    TouchFrame::new(points, index)
}
