//! Save/restore stack for transform and clip state

use crate::geometry::Rect;
use crate::transform::Transform;

/// Graphics state captured by `save_state`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasState {
    /// Current transformation matrix (local -> surface)
    pub transform: Transform,
    /// Clip in surface coordinates, `None` when unclipped
    pub clip: Option<Rect>,
}

/// Transform/clip stack shared by every drawing surface
///
/// `restore` without a matching `save` is ignored.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: CanvasState,
    saved: Vec<CanvasState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a non-identity base transform (e.g. a device scale)
    pub fn with_base(transform: Transform) -> Self {
        Self {
            current: CanvasState {
                transform,
                clip: None,
            },
            saved: Vec::new(),
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the most recent save; returns `false` when the stack was empty
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// Compose `transform` onto the current matrix
    pub fn concat(&mut self, transform: &Transform) {
        self.current.transform = self.current.transform.multiply(transform);
    }

    /// Intersect the clip with `rect` (given in local coordinates)
    pub fn clip_rect(&mut self, rect: Rect) {
        let device = self.current.transform.transform_rect(rect);
        self.current.clip = Some(match self.current.clip {
            Some(existing) => existing.intersect(&device).unwrap_or(Rect::ZERO),
            None => device,
        });
    }

    pub fn current(&self) -> &CanvasState {
        &self.current
    }

    pub fn transform(&self) -> Transform {
        self.current.transform
    }

    pub fn clip(&self) -> Option<Rect> {
        self.current.clip
    }

    /// Number of unmatched saves
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_save_restore() {
        let mut stack = StateStack::new();
        let before = *stack.current();

        for i in 0..5 {
            stack.save();
            stack.concat(&Transform::translate(i as f32, 1.0));
            stack.clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        }
        assert_eq!(stack.depth(), 5);

        for _ in 0..7 {
            stack.restore();
        }
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), before);
    }

    #[test]
    fn test_restore_on_empty_stack_is_noop() {
        let mut stack = StateStack::new();
        stack.concat(&Transform::scale(2.0, 2.0));
        assert!(!stack.restore());
        assert_eq!(stack.transform(), Transform::scale(2.0, 2.0));
    }

    #[test]
    fn test_restore_undoes_only_latest_save() {
        let mut stack = StateStack::new();
        stack.concat(&Transform::translate(5.0, 0.0));
        stack.save();
        stack.concat(&Transform::translate(0.0, 7.0));
        stack.save();
        stack.concat(&Transform::scale(3.0, 3.0));

        stack.restore();
        assert_eq!(stack.transform(), Transform::translate(5.0, 7.0));
        stack.restore();
        assert_eq!(stack.transform(), Transform::translate(5.0, 0.0));
    }

    #[test]
    fn test_clip_intersects_in_surface_space() {
        let mut stack = StateStack::new();
        stack.concat(&Transform::translate(10.0, 10.0));
        stack.clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        stack.clip_rect(Rect::new(25.0, 25.0, 100.0, 100.0));
        assert_eq!(stack.clip(), Some(Rect::new(35.0, 35.0, 25.0, 25.0)));

        stack.clip_rect(Rect::new(500.0, 500.0, 1.0, 1.0));
        assert_eq!(stack.clip(), Some(Rect::ZERO));
    }
}
