//! Layer-backed native surface

use drawboard_graphics::{Canvas, Color, Rect, Size};
use drawboard_view::NativeSurface;
use tracing::trace;

use crate::canvas::LayerCanvas;
use crate::layer::{LayerContainer, LayerTree};

/// A custom-drawn UIKit control backed by a container layer
pub struct IosSurface<C: LayerContainer = LayerTree> {
    container: C,
    background: Option<Color>,
    transparent: bool,
    cancel_default_drawing: bool,
}

impl IosSurface<LayerTree> {
    pub fn new() -> Self {
        Self::with_container(LayerTree::new())
    }
}

impl Default for IosSurface<LayerTree> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LayerContainer> IosSurface<C> {
    pub fn with_container(container: C) -> Self {
        Self {
            container,
            background: None,
            transparent: false,
            cancel_default_drawing: false,
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn into_container(self) -> C {
        self.container
    }

    /// Push background and opacity to the container layer
    fn apply_background(&mut self) {
        let background = if self.transparent || self.cancel_default_drawing {
            None
        } else {
            self.background
        };
        let opaque = !self.transparent && background.map_or(false, |c| c.a == 255);
        trace!(?background, opaque, "container background");
        self.container.set_background(background);
        self.container.set_opaque(opaque);
    }
}

impl<C: LayerContainer> NativeSurface for IosSurface<C> {
    fn clear(&mut self) {
        self.container.remove_all_sublayers();
    }

    fn begin_pass(&mut self, size: Size) -> Box<dyn Canvas + '_> {
        Box::new(LayerCanvas::new(&mut self.container, size))
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.container.set_mask(clip);
    }

    fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
        self.apply_background();
    }

    fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
        self.apply_background();
    }

    fn set_cancel_default_drawing(&mut self, cancel: bool) {
        self.cancel_default_drawing = cancel;
        self.apply_background();
    }
}
