//! View renderer
//!
//! [`ViewRenderer`] binds one [`DrawingView`] to one native control. It owns
//! the redraw pass (clear, fresh canvas, `draw`), keeps the native clip and
//! background flags in sync with the view's properties, and routes the
//! platform touch stream to the view while the control is attached.
//!
//! All callbacks hold weak references, so dropping the renderer silences
//! every subscription it made. A redraw requested while a pass is already
//! running is dropped instead of re-entering the pass.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use drawboard_graphics::{DrawError, DrawResult};
use drawboard_platform::{
    RouteOutcome, Subscription, TouchFrame, TouchFrameSource, TouchRouter, TouchSession,
    VisualNode,
};
use tracing::{debug, trace};

use crate::error::{Result, ViewError};
use crate::surface::NativeSurface;
use crate::view::{DrawingView, Property, ViewProperties};

/// Result of a redraw request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// The view drew a fresh pass
    Drawn,
    /// Width or height is still the unmeasured sentinel
    Unmeasured,
    /// No view is bound
    NoView,
    /// A pass was already running
    Reentrant,
}

struct Control<S> {
    surface: S,
    node: Rc<dyn VisualNode>,
    _touches: Subscription,
}

struct Inner<S> {
    view: Option<Rc<dyn DrawingView>>,
    view_subscriptions: Vec<Subscription>,
    control: Option<Control<S>>,
    router: TouchRouter,
    /// Bumped whenever the view or control changes
    generation: u64,
    passes: u64,
}

/// Renders a [`DrawingView`] into a [`NativeSurface`]
pub struct ViewRenderer<S: NativeSurface + 'static> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S: NativeSurface + 'static> ViewRenderer<S> {
    pub fn new() -> Self {
        Self::with_router(TouchRouter::new())
    }

    /// Route touches with a preconfigured router
    pub fn with_router(router: TouchRouter) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                view: None,
                view_subscriptions: Vec::new(),
                control: None,
                router,
                generation: 0,
                passes: 0,
            })),
        }
    }

    /// Bind a new view (or none), replacing the previous one
    ///
    /// Unsubscribes from the old view's invalidate and property streams,
    /// subscribes to the new view's, and redraws.
    pub fn set_view(&self, view: Option<Rc<dyn DrawingView>>) -> Result<()> {
        let old_subscriptions = {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| ViewError::Busy)?;
            let old = std::mem::take(&mut inner.view_subscriptions);

            if let Some(view) = &view {
                let state = view.state();
                let weak = Rc::downgrade(&self.inner);
                inner.view_subscriptions.push(state.invalidator().subscribe({
                    let weak = weak.clone();
                    move || Self::handle_invalidate(&weak)
                }));
                inner
                    .view_subscriptions
                    .push(state.property_changes().subscribe(move |property| {
                        Self::handle_property(&weak, *property)
                    }));
            }

            inner.view = view;
            inner.generation += 1;
            inner.router.reset();
            inner.sync_surface();
            inner.redraw_logged();
            old
        };
        drop(old_subscriptions);
        Ok(())
    }

    /// Bind a native control
    ///
    /// Replacing a control detaches the previous one first; its surface is
    /// returned. The renderer subscribes to `touches` until detached.
    pub fn attach(
        &self,
        surface: S,
        node: Rc<dyn VisualNode>,
        touches: &TouchFrameSource,
    ) -> Result<Option<S>> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| ViewError::Busy)?;
        let previous = inner.control.take().map(|control| control.surface);

        let weak = Rc::downgrade(&self.inner);
        let subscription = touches.subscribe(move |frame| Self::handle_touch(&weak, frame));
        inner.control = Some(Control {
            surface,
            node,
            _touches: subscription,
        });
        inner.generation += 1;
        inner.router.reset();
        debug!(replaced = previous.is_some(), "native control attached");

        inner.sync_surface();
        inner.redraw_logged();
        Ok(previous)
    }

    /// Release the native control and its touch subscription
    pub fn detach(&self) -> Result<Option<S>> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| ViewError::Busy)?;
        let control = inner.control.take();
        if control.is_some() {
            inner.generation += 1;
            inner.router.reset();
            debug!("native control detached");
        }
        Ok(control.map(|control| control.surface))
    }

    /// React to a bound property changing
    pub fn on_property_changed(&self, property: Property) -> Result<()> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| ViewError::Busy)?;
        inner.apply_property(property);
        Ok(())
    }

    /// Redraw now, logging instead of returning failures
    pub fn redraw(&self) {
        if let Err(e) = self.try_redraw() {
            debug!("redraw skipped: {}", e);
        }
    }

    /// Redraw now
    ///
    /// Fails with [`DrawError::DetachedSurface`] when no control is attached.
    pub fn try_redraw(&self) -> DrawResult<RedrawOutcome> {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.redraw(),
            Err(_) => {
                trace!("redraw requested during a pass, dropped");
                Ok(RedrawOutcome::Reentrant)
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().control.is_some()
    }

    pub fn view(&self) -> Option<Rc<dyn DrawingView>> {
        self.inner.borrow().view.clone()
    }

    /// State of the gesture currently being routed to the view
    pub fn touch_session(&self) -> TouchSession {
        self.inner.borrow().router.session()
    }

    /// Completed redraw passes
    pub fn passes(&self) -> u64 {
        self.inner.borrow().passes
    }

    /// Inspect the attached surface
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        let inner = self.inner.try_borrow().ok()?;
        inner.control.as_ref().map(|control| f(&control.surface))
    }

    fn handle_invalidate(weak: &Weak<RefCell<Inner<S>>>) {
        let Some(cell) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = cell.try_borrow_mut() else {
            trace!("invalidate during a pass, dropped");
            return;
        };
        inner.redraw_logged();
    }

    fn handle_property(weak: &Weak<RefCell<Inner<S>>>, property: Property) {
        let Some(cell) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = cell.try_borrow_mut() else {
            trace!(?property, "property change during a pass, dropped");
            return;
        };
        inner.apply_property(property);
    }

    fn handle_touch(weak: &Weak<RefCell<Inner<S>>>, frame: &TouchFrame) {
        let Some(cell) = weak.upgrade() else {
            return;
        };

        // Route without holding the borrow so handlers may invalidate.
        let (view, node, mut router, generation) = {
            let Ok(inner) = cell.try_borrow() else {
                return;
            };
            let (Some(view), Some(control)) = (&inner.view, &inner.control) else {
                return;
            };
            (
                Rc::clone(view),
                Rc::clone(&control.node),
                inner.router.clone(),
                inner.generation,
            )
        };

        let outcome = router.route(frame, node.as_ref(), view.as_ref());
        if let RouteOutcome::Dispatched { phase, handled } = outcome {
            trace!(?phase, handled, "touches delivered");
        }

        let Ok(mut inner) = cell.try_borrow_mut() else {
            return;
        };
        // Attach, detach and set_view bump the generation; stale sessions are discarded
        if inner.generation == generation {
            inner.router = router;
        }
    }
}

impl<S: NativeSurface + 'static> Default for ViewRenderer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NativeSurface + 'static> fmt::Debug for ViewRenderer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("ViewRenderer")
                .field("has_view", &inner.view.is_some())
                .field("attached", &inner.control.is_some())
                .field("passes", &inner.passes)
                .finish(),
            Err(_) => f.debug_struct("ViewRenderer").finish_non_exhaustive(),
        }
    }
}

impl<S: NativeSurface> Inner<S> {
    fn properties(&self) -> Option<ViewProperties> {
        self.view.as_ref().map(|view| view.state().properties())
    }

    /// Push every surface-facing property to the control
    fn sync_surface(&mut self) {
        let Some(props) = self.properties() else {
            return;
        };
        let Some(control) = self.control.as_mut() else {
            return;
        };
        control.surface.set_transparent(props.transparent);
        control
            .surface
            .set_cancel_default_drawing(props.cancel_default_drawing);
        control.surface.set_background(props.background);
        update_clip(&mut control.surface, &props);
    }

    fn apply_property(&mut self, property: Property) {
        let Some(props) = self.properties() else {
            return;
        };
        let Some(control) = self.control.as_mut() else {
            return;
        };
        let surface = &mut control.surface;

        match property {
            Property::Clip => {
                update_clip(surface, &props);
                return;
            }
            Property::Width | Property::Height => update_clip(surface, &props),
            Property::BackgroundColor => surface.set_background(props.background),
            Property::Transparent => surface.set_transparent(props.transparent),
            Property::CancelDefaultDrawing => {
                surface.set_cancel_default_drawing(props.cancel_default_drawing)
            }
        }
        self.redraw_logged();
    }

    fn redraw(&mut self) -> DrawResult<RedrawOutcome> {
        let Some(control) = self.control.as_mut() else {
            return Err(DrawError::DetachedSurface);
        };
        let Some(view) = self.view.clone() else {
            return Ok(RedrawOutcome::NoView);
        };

        let props = view.state().properties();
        if !props.is_measured() {
            trace!(width = props.width, height = props.height, "view not measured");
            return Ok(RedrawOutcome::Unmeasured);
        }

        let frame = props.frame();
        control.surface.clear();
        {
            let mut canvas = control.surface.begin_pass(frame.size());
            view.draw(canvas.as_mut(), frame);
        }
        self.passes += 1;
        debug!(pass = self.passes, width = frame.width, height = frame.height, "redraw");
        Ok(RedrawOutcome::Drawn)
    }

    fn redraw_logged(&mut self) {
        match self.redraw() {
            Ok(outcome) => trace!(?outcome, "redraw finished"),
            Err(DrawError::DetachedSurface) => trace!("redraw skipped: no control attached"),
            Err(e) => debug!("redraw failed: {}", e),
        }
    }
}

fn update_clip<S: NativeSurface + ?Sized>(surface: &mut S, props: &ViewProperties) {
    if !props.is_measured() {
        return;
    }
    surface.set_clip(props.clip.then(|| props.frame()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FnView;
    use drawboard_graphics::prelude::*;
    use drawboard_platform::{TouchPhase, TouchPoint, ViewNode};
    use std::cell::Cell;

    #[derive(Default)]
    struct TestSurface {
        canvas: Option<RecordingCanvas>,
        clears: usize,
        clip: Option<Rect>,
        clip_updates: usize,
        background: Option<Color>,
        transparent: bool,
        cancel_default_drawing: bool,
    }

    impl TestSurface {
        fn commands(&self) -> &[DrawCommand] {
            self.canvas.as_ref().map(|c| c.commands()).unwrap_or(&[])
        }
    }

    impl NativeSurface for TestSurface {
        fn clear(&mut self) {
            self.clears += 1;
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.clear();
            }
        }

        fn begin_pass(&mut self, size: Size) -> Box<dyn Canvas + '_> {
            let canvas = self.canvas.get_or_insert_with(|| RecordingCanvas::new(size));
            Box::new(canvas)
        }

        fn set_clip(&mut self, clip: Option<Rect>) {
            self.clip = clip;
            self.clip_updates += 1;
        }

        fn set_background(&mut self, color: Option<Color>) {
            self.background = color;
        }

        fn set_transparent(&mut self, transparent: bool) {
            self.transparent = transparent;
        }

        fn set_cancel_default_drawing(&mut self, cancel: bool) {
            self.cancel_default_drawing = cancel;
        }
    }

    fn red_box_view() -> Rc<FnView> {
        Rc::new(
            FnView::new(|canvas, frame| canvas.fill_rectangle(frame, Colors::RED))
                .with_size(100.0, 50.0),
        )
    }

    fn attached(view: Rc<FnView>) -> (ViewRenderer<TestSurface>, TouchFrameSource, Rc<ViewNode>) {
        let renderer = ViewRenderer::new();
        let touches = TouchFrameSource::new();
        let page = ViewNode::root(Size::new(400.0, 800.0));
        let node = ViewNode::child(page, Rect::new(10.0, 10.0, 100.0, 50.0));
        renderer.set_view(Some(view)).unwrap();
        renderer
            .attach(TestSurface::default(), node.clone(), &touches)
            .unwrap();
        (renderer, touches, node)
    }

    #[test]
    fn test_attach_draws_once() {
        let (renderer, _touches, _node) = attached(red_box_view());
        assert_eq!(renderer.passes(), 1);
        let commands = renderer.with_surface(|s| s.commands().to_vec()).unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_redraw_without_control_reports_detached() {
        let renderer = ViewRenderer::<TestSurface>::new();
        renderer.set_view(Some(red_box_view())).unwrap();
        assert_eq!(renderer.try_redraw(), Err(DrawError::DetachedSurface));
    }

    #[test]
    fn test_invalidate_clears_previous_pass() {
        let view = red_box_view();
        let (renderer, _touches, _node) = attached(view.clone());

        view.state().invalidate();
        view.state().invalidate();
        assert_eq!(renderer.passes(), 3);
        renderer
            .with_surface(|s| {
                assert_eq!(s.clears, 3);
                assert_eq!(s.commands().len(), 1);
            })
            .unwrap();
    }

    #[test]
    fn test_unmeasured_view_skips_redraw_and_clip() {
        let view = Rc::new(FnView::new(|canvas, frame| {
            canvas.fill_rectangle(frame, Colors::RED)
        }));
        view.state().set_clip(true);
        let (renderer, _touches, _node) = attached(view.clone());

        assert_eq!(renderer.try_redraw(), Ok(RedrawOutcome::Unmeasured));
        view.state().set_width(100.0);
        renderer
            .with_surface(|s| {
                assert_eq!(s.clears, 0);
                assert_eq!(s.clip_updates, 0);
            })
            .unwrap();

        view.state().set_height(20.0);
        assert_eq!(renderer.passes(), 1);
        renderer
            .with_surface(|s| assert_eq!(s.clip, Some(Rect::new(0.0, 0.0, 100.0, 20.0))))
            .unwrap();
    }

    #[test]
    fn test_property_changes_reach_surface() {
        let view = red_box_view();
        let (renderer, _touches, _node) = attached(view.clone());

        view.state().set_background(Some(Colors::BLUE));
        view.state().set_transparent(true);
        view.state().set_cancel_default_drawing(true);
        view.state().set_clip(true);

        renderer
            .with_surface(|s| {
                assert_eq!(s.background, Some(Colors::BLUE));
                assert!(s.transparent);
                assert!(s.cancel_default_drawing);
                assert_eq!(s.clip, Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
            })
            .unwrap();
        // Clip updates do not redraw
        assert_eq!(renderer.passes(), 4);
    }

    #[test]
    fn test_invalidate_inside_draw_is_dropped() {
        let slot: Rc<RefCell<Option<Rc<FnView>>>> = Rc::new(RefCell::new(None));
        let draws = Rc::new(Cell::new(0));
        let view = {
            let (slot, draws) = (slot.clone(), draws.clone());
            Rc::new(
                FnView::new(move |_, _| {
                    draws.set(draws.get() + 1);
                    if let Some(view) = slot.borrow().as_ref() {
                        view.state().invalidate();
                    }
                })
                .with_size(10.0, 10.0),
            )
        };
        *slot.borrow_mut() = Some(view.clone());

        let (renderer, _touches, _node) = attached(view.clone());
        assert_eq!(draws.get(), 1);
        view.state().invalidate();
        assert_eq!(draws.get(), 2);
        assert_eq!(renderer.passes(), 2);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_touches_routed_while_attached() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let view = {
            let hits = hits.clone();
            Rc::new(
                FnView::new(|_, _| {})
                    .with_size(100.0, 50.0)
                    .on_touch(move |phase, touches| {
                        hits.borrow_mut().push((phase, touches[0].position));
                        true
                    }),
            )
        };
        let (renderer, touches, _node) = attached(view);

        touches.emit(&TouchFrame::single(TouchPoint::new(1, 20.0, 30.0, TouchPhase::Began)));
        touches.emit(&TouchFrame::single(TouchPoint::new(1, 500.0, 30.0, TouchPhase::Moved)));
        assert_eq!(*hits.borrow(), vec![(TouchPhase::Began, Point::new(10.0, 20.0))]);

        let surface = renderer.detach().unwrap();
        assert!(surface.is_some());
        assert_eq!(touches.subscriber_count(), 0);
        touches.emit(&TouchFrame::single(TouchPoint::new(1, 20.0, 30.0, TouchPhase::Ended)));
        assert_eq!(hits.borrow().len(), 1);
    }

    type RendererSlot = Rc<RefCell<Option<Rc<ViewRenderer<TestSurface>>>>>;

    fn begin(x: f32, y: f32) -> TouchFrame {
        TouchFrame::single(TouchPoint::new(1, x, y, TouchPhase::Began))
    }

    #[test]
    fn test_touch_handler_can_invalidate() {
        let slot: Rc<RefCell<Option<Rc<FnView>>>> = Rc::new(RefCell::new(None));
        let view = {
            let slot = slot.clone();
            Rc::new(
                FnView::new(|canvas, frame| canvas.fill_rectangle(frame, Colors::RED))
                    .with_size(100.0, 50.0)
                    .on_touch(move |_, _| {
                        if let Some(view) = slot.borrow().as_ref() {
                            view.state().invalidate();
                        }
                        true
                    }),
            )
        };
        *slot.borrow_mut() = Some(view.clone());
        let (renderer, touches, _node) = attached(view);
        assert_eq!(renderer.passes(), 1);

        touches.emit(&begin(20.0, 30.0));
        assert_eq!(renderer.passes(), 2);
        assert_eq!(renderer.touch_session(), TouchSession::Began);
        touches.emit(&TouchFrame::single(TouchPoint::new(1, 25.0, 30.0, TouchPhase::Moved)));
        assert_eq!(renderer.passes(), 3);
        assert_eq!(renderer.touch_session(), TouchSession::Moved);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_detach_from_touch_handler_discards_session() {
        let slot: RendererSlot = Rc::new(RefCell::new(None));
        let view = {
            let slot = slot.clone();
            Rc::new(FnView::new(|_, _| {}).with_size(100.0, 50.0).on_touch(
                move |_, _| {
                    if let Some(renderer) = slot.borrow().as_ref() {
                        assert!(renderer.detach().unwrap().is_some());
                    }
                    true
                },
            ))
        };
        let (renderer, touches, _node) = attached(view);
        let renderer = Rc::new(renderer);
        *slot.borrow_mut() = Some(renderer.clone());

        touches.emit(&begin(20.0, 30.0));
        assert!(!renderer.is_attached());
        assert_eq!(renderer.touch_session(), TouchSession::Idle);
        assert_eq!(touches.subscriber_count(), 0);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_set_view_from_touch_handler_discards_session() {
        let slot: RendererSlot = Rc::new(RefCell::new(None));
        let replacement = red_box_view();
        let view = {
            let (slot, replacement) = (slot.clone(), replacement.clone());
            Rc::new(FnView::new(|_, _| {}).with_size(100.0, 50.0).on_touch(
                move |_, _| {
                    if let Some(renderer) = slot.borrow().as_ref() {
                        renderer.set_view(Some(replacement.clone())).unwrap();
                    }
                    true
                },
            ))
        };
        let (renderer, touches, _node) = attached(view);
        let renderer = Rc::new(renderer);
        *slot.borrow_mut() = Some(renderer.clone());

        touches.emit(&begin(20.0, 30.0));
        assert_eq!(renderer.touch_session(), TouchSession::Idle);
        assert!(renderer.is_attached());
        assert_eq!(renderer.passes(), 2);
        assert_eq!(replacement.state().invalidator().subscriber_count(), 1);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_replacing_view_moves_subscriptions() {
        let first = red_box_view();
        let second = red_box_view();
        let (renderer, _touches, _node) = attached(first.clone());

        renderer.set_view(Some(second.clone())).unwrap();
        assert_eq!(first.state().invalidator().subscriber_count(), 0);
        assert_eq!(second.state().invalidator().subscriber_count(), 1);

        let before = renderer.passes();
        first.state().invalidate();
        assert_eq!(renderer.passes(), before);
        second.state().invalidate();
        assert_eq!(renderer.passes(), before + 1);
    }

    #[test]
    fn test_dropping_renderer_releases_subscriptions() {
        let view = red_box_view();
        let (renderer, touches, _node) = attached(view.clone());
        drop(renderer);
        assert_eq!(touches.subscriber_count(), 0);
        assert_eq!(view.state().invalidator().subscriber_count(), 0);
        view.state().invalidate();
    }
}
