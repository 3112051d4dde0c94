//! Touch input types
//!
//! Native platforms report touches as frames: every finger currently on the
//! screen plus the index of the primary one. The primary point decides which
//! gesture callback a frame is routed to.

use drawboard_graphics::Point;
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Touch phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Finger went down
    Began,
    /// Finger moved
    Moved,
    /// Finger lifted
    Ended,
    /// The system took the touch away (or it left the surface)
    Cancelled,
}

/// Native touch action as reported by the platform's touch stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    /// Pointer left the surface
    Leave,
    Cancel,
}

impl From<TouchAction> for TouchPhase {
    fn from(action: TouchAction) -> Self {
        match action {
            TouchAction::Down => TouchPhase::Began,
            TouchAction::Move => TouchPhase::Moved,
            TouchAction::Up => TouchPhase::Ended,
            TouchAction::Leave | TouchAction::Cancel => TouchPhase::Cancelled,
        }
    }
}

/// Coordinate space delivered to touch targets
///
/// Native touch streams report page coordinates, and `Page` forwards them
/// untouched. Routers default to `Local`; select `Page` through
/// `[touch] coordinates = "page"` for handlers written against page positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchCoordinates {
    /// Relative to the view's top-left corner
    #[default]
    Local,
    /// Relative to the root page
    Page,
}

/// A single touch point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Identifier stable for the lifetime of one finger
    pub id: u64,
    pub position: Point,
    pub phase: TouchPhase,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32, phase: TouchPhase) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            phase,
        }
    }

    /// Same touch, shifted by `(dx, dy)`
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..self
        }
    }
}

/// All concurrent touch points in one native report
#[derive(Clone, Debug, PartialEq)]
pub struct TouchFrame {
    points: Vec<TouchPoint>,
    primary: usize,
}

impl TouchFrame {
    /// Build a frame; fails when `primary` does not index into `points`
    pub fn new(points: Vec<TouchPoint>, primary: usize) -> Result<Self> {
        if primary >= points.len() {
            return Err(PlatformError::Other(format!(
                "primary touch index {} out of range for {} points",
                primary,
                points.len()
            )));
        }
        Ok(Self { points, primary })
    }

    /// A frame holding one touch
    pub fn single(point: TouchPoint) -> Self {
        Self {
            points: vec![point],
            primary: 0,
        }
    }

    pub fn points(&self) -> &[TouchPoint] {
        &self.points
    }

    pub fn primary(&self) -> &TouchPoint {
        &self.points[self.primary]
    }

    pub fn primary_index(&self) -> usize {
        self.primary
    }

    /// Phase of the primary touch
    pub fn phase(&self) -> TouchPhase {
        self.primary().phase
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_to_phase() {
        assert_eq!(TouchPhase::from(TouchAction::Down), TouchPhase::Began);
        assert_eq!(TouchPhase::from(TouchAction::Move), TouchPhase::Moved);
        assert_eq!(TouchPhase::from(TouchAction::Up), TouchPhase::Ended);
        assert_eq!(TouchPhase::from(TouchAction::Leave), TouchPhase::Cancelled);
        assert_eq!(TouchPhase::from(TouchAction::Cancel), TouchPhase::Cancelled);
    }

    #[test]
    fn test_frame_primary_must_be_in_range() {
        let points = vec![
            TouchPoint::new(1, 0.0, 0.0, TouchPhase::Moved),
            TouchPoint::new(2, 5.0, 5.0, TouchPhase::Began),
        ];
        let frame = TouchFrame::new(points.clone(), 1).unwrap();
        assert_eq!(frame.phase(), TouchPhase::Began);
        assert_eq!(frame.primary().id, 2);

        assert!(TouchFrame::new(points, 2).is_err());
        assert!(TouchFrame::new(Vec::new(), 0).is_err());
    }
}
