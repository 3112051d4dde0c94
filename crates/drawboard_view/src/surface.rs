//! Native control surface

use drawboard_graphics::{Canvas, Color, Rect, Size};

/// The native control a [`ViewRenderer`](crate::ViewRenderer) draws into
///
/// A surface hands out one canvas per redraw pass. The canvas borrows the
/// surface mutably, so a pass cannot outlive the surface nor overlap another.
pub trait NativeSurface {
    /// Remove everything drawn by earlier passes
    fn clear(&mut self);

    /// Start a redraw pass sized to the view
    fn begin_pass(&mut self, size: Size) -> Box<dyn Canvas + '_>;

    /// Restrict the control's visible area, `None` to remove the clip
    fn set_clip(&mut self, clip: Option<Rect>);

    fn set_background(&mut self, color: Option<Color>);

    fn set_transparent(&mut self, transparent: bool);

    /// Skip the control's own background drawing
    fn set_cancel_default_drawing(&mut self, cancel: bool);
}
