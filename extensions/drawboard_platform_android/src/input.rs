//! MotionEvent to touch frame conversion
//!
//! Android reports every finger on the screen in each `MotionEvent`, plus the
//! index of the pointer the action refers to. Coordinates arrive in device
//! pixels and are divided by the display density.

use drawboard_platform::{PlatformError, Result, TouchAction, TouchFrame, TouchPhase, TouchPoint};
use tracing::trace;

/// Raw `MotionEvent` action codes
pub mod action {
    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MOVE: i32 = 2;
    pub const CANCEL: i32 = 3;
    pub const OUTSIDE: i32 = 4;
    pub const POINTER_DOWN: i32 = 5;
    pub const POINTER_UP: i32 = 6;
    pub const HOVER_EXIT: i32 = 10;

    pub const MASK: i32 = 0xff;
    pub const POINTER_INDEX_SHIFT: i32 = 8;
}

/// Map a masked action code to a touch action
pub fn action_from_raw(raw: i32) -> Result<TouchAction> {
    match raw & action::MASK {
        action::DOWN | action::POINTER_DOWN => Ok(TouchAction::Down),
        action::MOVE => Ok(TouchAction::Move),
        action::UP | action::POINTER_UP => Ok(TouchAction::Up),
        action::CANCEL => Ok(TouchAction::Cancel),
        action::OUTSIDE | action::HOVER_EXIT => Ok(TouchAction::Leave),
        _ => Err(PlatformError::UnknownTouchAction(raw)),
    }
}

/// Pointer index packed into the upper bits of a raw action
pub fn action_index(raw: i32) -> usize {
    ((raw >> action::POINTER_INDEX_SHIFT) & action::MASK) as usize
}

/// One pointer of a motion event, in device pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

impl MotionPointer {
    pub fn new(id: i32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Which pointers a motion action refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionScope {
    /// `DOWN`, `MOVE`, `UP`, `CANCEL`: the gesture as a whole
    Gesture,
    /// `POINTER_DOWN` / `POINTER_UP`: an extra finger at this index
    Pointer(usize),
}

/// Build a touch frame from a motion event's pointers
///
/// The gesture's first finger is the primary point, so extra fingers landing
/// or lifting mid-gesture arrive as a `Moved` frame and never restart or end
/// the session. The finger an extra-pointer action refers to carries that
/// action's phase. Other fingers report `Moved`, or `Cancelled` when the whole
/// gesture is cancelled.
pub fn frame_from_motion(
    touch_action: TouchAction,
    pointers: &[MotionPointer],
    scope: MotionScope,
    density: f32,
) -> Result<TouchFrame> {
    if pointers.is_empty() {
        return Err(PlatformError::Other("motion event without pointers".into()));
    }
    let density = if density > 0.0 { density } else { 1.0 };
    let phase = TouchPhase::from(touch_action);
    let bystander = match phase {
        TouchPhase::Cancelled => TouchPhase::Cancelled,
        _ => TouchPhase::Moved,
    };

    let (acting, primary) = match scope {
        MotionScope::Gesture => (0, 0),
        MotionScope::Pointer(index) => {
            if index >= pointers.len() || pointers.len() < 2 {
                return Err(PlatformError::Other(format!(
                    "pointer index {} out of range for {} pointers",
                    index,
                    pointers.len()
                )));
            }
            // The first remaining finger stays primary
            (index, if index == 0 { 1 } else { 0 })
        }
    };

    let points = pointers
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let phase = if index == acting { phase } else { bystander };
            TouchPoint::new(p.id as u64, p.x / density, p.y / density, phase)
        })
        .collect();
    TouchFrame::new(points, primary)
}

/// Convert a raw action code plus pointers, as delivered through a JNI bridge
pub fn frame_from_raw(raw_action: i32, pointers: &[MotionPointer], density: f32) -> Result<TouchFrame> {
    let touch_action = action_from_raw(raw_action)?;
    let scope = match raw_action & action::MASK {
        action::POINTER_DOWN | action::POINTER_UP => MotionScope::Pointer(action_index(raw_action)),
        _ => MotionScope::Gesture,
    };
    trace!(?touch_action, ?scope, pointers = pointers.len(), "motion event");
    frame_from_motion(touch_action, pointers, scope, density)
}

/// Convert an NDK motion event; `None` for actions that are not touches
#[cfg(target_os = "android")]
pub fn convert_motion_event(event: &ndk::event::MotionEvent, density: f32) -> Option<TouchFrame> {
    use ndk::event::MotionAction;

    let touch_action = match event.action() {
        MotionAction::Down | MotionAction::PointerDown => TouchAction::Down,
        MotionAction::Move => TouchAction::Move,
        MotionAction::Up | MotionAction::PointerUp => TouchAction::Up,
        MotionAction::Cancel => TouchAction::Cancel,
        MotionAction::Outside | MotionAction::HoverExit => TouchAction::Leave,
        other => {
            trace!(?other, "motion action ignored");
            return None;
        }
    };
    let pointers: Vec<MotionPointer> = event
        .pointers()
        .map(|p| MotionPointer::new(p.pointer_id(), p.x(), p.y()))
        .collect();
    let scope = match event.action() {
        MotionAction::PointerDown | MotionAction::PointerUp => {
            MotionScope::Pointer(event.pointer_index())
        }
        _ => MotionScope::Gesture,
    };
    frame_from_motion(touch_action, &pointers, scope, density).ok()
}
