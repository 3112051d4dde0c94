//! Drawing views
//!
//! A [`DrawingView`] is the cross-platform side of a custom-drawn control: it
//! knows how to paint itself onto a [`Canvas`] and how to react to touches.
//! Its bindable properties and notification streams live in a [`ViewState`].

use std::cell::RefCell;
use std::fmt;

use drawboard_graphics::{Canvas, Color, Rect};
use drawboard_platform::{EventSource, Subscription, TouchPhase, TouchPoint, TouchTarget};

/// Bindable property identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Clip,
    Transparent,
    CancelDefaultDrawing,
    Width,
    Height,
    BackgroundColor,
}

/// Snapshot of a view's bindable properties
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewProperties {
    /// Width in view units, [`Rect::UNMEASURED`] before layout
    pub width: f32,
    /// Height in view units, [`Rect::UNMEASURED`] before layout
    pub height: f32,
    /// Clip drawing to the view bounds
    pub clip: bool,
    pub transparent: bool,
    /// Suppress the native control's own background drawing
    pub cancel_default_drawing: bool,
    pub background: Option<Color>,
}

impl ViewProperties {
    pub fn is_measured(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// The frame passed to `draw`: origin at zero, sized to the view
    pub fn frame(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for ViewProperties {
    fn default() -> Self {
        Self {
            width: Rect::UNMEASURED,
            height: Rect::UNMEASURED,
            clip: false,
            transparent: false,
            cancel_default_drawing: false,
            background: None,
        }
    }
}

/// Redraw request stream raised by a view
#[derive(Clone, Debug, Default)]
pub struct Invalidator {
    source: EventSource<()>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every attached renderer to redraw
    pub fn invalidate(&self) {
        self.source.emit(&());
    }

    pub fn subscribe<F: Fn() + 'static>(&self, handler: F) -> Subscription {
        self.source.subscribe(move |_| handler())
    }

    pub fn subscriber_count(&self) -> usize {
        self.source.subscriber_count()
    }
}

/// Properties plus the notification streams a renderer listens to
#[derive(Default)]
pub struct ViewState {
    properties: RefCell<ViewProperties>,
    invalidator: Invalidator,
    changes: EventSource<Property>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        let state = Self::new();
        {
            let mut props = state.properties.borrow_mut();
            props.width = width;
            props.height = height;
        }
        state
    }

    pub fn properties(&self) -> ViewProperties {
        *self.properties.borrow()
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    pub fn property_changes(&self) -> &EventSource<Property> {
        &self.changes
    }

    pub fn invalidate(&self) {
        self.invalidator.invalidate();
    }

    pub fn set_width(&self, width: f32) {
        self.update(Property::Width, |p| replace(&mut p.width, width));
    }

    pub fn set_height(&self, height: f32) {
        self.update(Property::Height, |p| replace(&mut p.height, height));
    }

    pub fn set_size(&self, width: f32, height: f32) {
        self.set_width(width);
        self.set_height(height);
    }

    pub fn set_clip(&self, clip: bool) {
        self.update(Property::Clip, |p| replace(&mut p.clip, clip));
    }

    pub fn set_transparent(&self, transparent: bool) {
        self.update(Property::Transparent, |p| replace(&mut p.transparent, transparent));
    }

    pub fn set_cancel_default_drawing(&self, cancel: bool) {
        self.update(Property::CancelDefaultDrawing, |p| {
            replace(&mut p.cancel_default_drawing, cancel)
        });
    }

    pub fn set_background(&self, color: Option<Color>) {
        self.update(Property::BackgroundColor, |p| replace(&mut p.background, color));
    }

    /// Apply `change` and notify when it reports a difference
    fn update(&self, property: Property, change: impl FnOnce(&mut ViewProperties) -> bool) {
        let changed = change(&mut self.properties.borrow_mut());
        if changed {
            self.changes.emit(&property);
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("properties", &self.properties.borrow())
            .finish()
    }
}

/// A custom-drawn view
pub trait DrawingView: TouchTarget {
    /// Paint the view; `frame` is `(0, 0, width, height)`
    fn draw(&self, canvas: &mut dyn Canvas, frame: Rect);

    fn state(&self) -> &ViewState;
}

/// Draw callback type for [`FnView`]
pub type DrawFn = Box<dyn Fn(&mut dyn Canvas, Rect)>;

/// Touch callback type for [`FnView`]
pub type TouchFn = Box<dyn Fn(TouchPhase, &[TouchPoint]) -> bool>;

/// A view backed by closures
///
/// # Example
///
/// ```rust
/// use drawboard_graphics::prelude::*;
/// use drawboard_view::{DrawingView, FnView};
///
/// let view = FnView::new(|canvas, frame| {
///     canvas.fill_ellipse(frame, Colors::BLUE);
/// })
/// .with_size(40.0, 40.0);
///
/// let mut recording = RecordingCanvas::new(Size::new(40.0, 40.0));
/// view.draw(&mut recording, view.state().properties().frame());
/// assert_eq!(recording.commands().len(), 1);
/// ```
pub struct FnView {
    state: ViewState,
    draw: DrawFn,
    touch: Option<TouchFn>,
}

impl FnView {
    pub fn new<F>(draw: F) -> Self
    where
        F: Fn(&mut dyn Canvas, Rect) + 'static,
    {
        Self {
            state: ViewState::new(),
            draw: Box::new(draw),
            touch: None,
        }
    }

    pub fn with_size(self, width: f32, height: f32) -> Self {
        self.state.set_size(width, height);
        self
    }

    /// Handle every touch phase with one callback
    pub fn on_touch<F>(mut self, handler: F) -> Self
    where
        F: Fn(TouchPhase, &[TouchPoint]) -> bool + 'static,
    {
        self.touch = Some(Box::new(handler));
        self
    }

    fn touch(&self, phase: TouchPhase, touches: &[TouchPoint]) -> bool {
        self.touch
            .as_ref()
            .map(|handler| handler(phase, touches))
            .unwrap_or(false)
    }
}

impl TouchTarget for FnView {
    fn touches_began(&self, touches: &[TouchPoint]) -> bool {
        self.touch(TouchPhase::Began, touches)
    }

    fn touches_moved(&self, touches: &[TouchPoint]) -> bool {
        self.touch(TouchPhase::Moved, touches)
    }

    fn touches_ended(&self, touches: &[TouchPoint]) -> bool {
        self.touch(TouchPhase::Ended, touches)
    }

    fn touches_cancelled(&self, touches: &[TouchPoint]) -> bool {
        self.touch(TouchPhase::Cancelled, touches)
    }
}

impl DrawingView for FnView {
    fn draw(&self, canvas: &mut dyn Canvas, frame: Rect) {
        (self.draw)(canvas, frame)
    }

    fn state(&self) -> &ViewState {
        &self.state
    }
}

impl fmt::Debug for FnView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnView")
            .field("state", &self.state)
            .field("touch", &self.touch.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_default_properties_are_unmeasured() {
        let props = ViewProperties::default();
        assert!(!props.is_measured());
        assert!(ViewState::with_size(10.0, 0.0).properties().is_measured());
    }

    #[test]
    fn test_setters_notify_only_on_change() {
        let state = ViewState::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            state.property_changes().subscribe(move |p| seen.borrow_mut().push(*p))
        };

        state.set_size(100.0, 50.0);
        state.set_size(100.0, 50.0);
        state.set_clip(true);
        state.set_background(Some(Color::rgb(1, 2, 3)));
        state.set_transparent(false);

        assert_eq!(
            *seen.borrow(),
            vec![
                Property::Width,
                Property::Height,
                Property::Clip,
                Property::BackgroundColor
            ]
        );
    }

    #[test]
    fn test_listener_can_read_properties_during_notification() {
        let state = Rc::new(ViewState::new());
        let width = Rc::new(Cell::new(0.0));
        let _sub = {
            let (state2, width) = (Rc::downgrade(&state), width.clone());
            state.property_changes().subscribe(move |_| {
                if let Some(s) = state2.upgrade() {
                    width.set(s.properties().width);
                }
            })
        };
        state.set_width(42.0);
        assert_eq!(width.get(), 42.0);
    }

    #[test]
    fn test_fn_view_touch_dispatch() {
        let phases = Rc::new(RefCell::new(Vec::new()));
        let view = {
            let phases = phases.clone();
            FnView::new(|_, _| {}).on_touch(move |phase, _| {
                phases.borrow_mut().push(phase);
                phase == TouchPhase::Began
            })
        };

        assert!(view.touches_began(&[]));
        assert!(!view.touches_cancelled(&[]));
        assert_eq!(*phases.borrow(), vec![TouchPhase::Began, TouchPhase::Cancelled]);
        assert!(!FnView::new(|_, _| {}).touches_moved(&[]));
    }
}
