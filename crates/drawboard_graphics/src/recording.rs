//! Command-recording canvas
//!
//! [`RecordingCanvas`] captures every accepted operation as a [`DrawCommand`].
//! Hosts use it to diff scenes between passes or to replay a scene onto a
//! native surface later; tests use it to observe what a view drew.

use tracing::warn;

use crate::brush::{Brush, Pen};
use crate::canvas::Canvas;
use crate::error::DrawResult;
use crate::geometry::{Rect, Size};
use crate::image::Image;
use crate::path::{self, PathOp};
use crate::state::StateStack;
use crate::text::{Font, TextAlignment};
use crate::transform::Transform;

/// A recorded canvas operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    // State
    Save,
    Restore,
    Transform(Transform),
    Clip(Rect),

    // Drawing
    Path {
        ops: Vec<PathOp>,
        pen: Option<Pen>,
        brush: Option<Brush>,
    },
    Rectangle {
        frame: Rect,
        pen: Option<Pen>,
        brush: Option<Brush>,
    },
    Ellipse {
        frame: Rect,
        pen: Option<Pen>,
        brush: Option<Brush>,
    },
    Image {
        image: Image,
        frame: Rect,
        alpha: f32,
    },
    Text {
        text: String,
        frame: Rect,
        font: Font,
        alignment: TextAlignment,
        pen: Option<Pen>,
        brush: Option<Brush>,
    },
}

/// A canvas that records commands instead of drawing
#[derive(Debug)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    state: StateStack,
    size: Size,
    scale: f32,
}

impl RecordingCanvas {
    pub fn new(size: Size) -> Self {
        Self::with_scale(size, 1.0)
    }

    pub fn with_scale(size: Size, scale: f32) -> Self {
        Self {
            commands: Vec::new(),
            state: StateStack::new(),
            size,
            scale,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Clear all recorded commands and reset the state stack
    pub fn clear(&mut self) {
        self.commands.clear();
        self.state = StateStack::new();
    }

    /// Current transform/clip stack
    pub fn state(&self) -> &StateStack {
        &self.state
    }

    /// Replay the recording onto another canvas
    ///
    /// Stops at the first image the target cannot composite.
    pub fn replay(&self, target: &mut dyn Canvas) -> DrawResult<()> {
        for command in &self.commands {
            match command {
                DrawCommand::Save => target.save_state(),
                DrawCommand::Restore => target.restore_state(),
                DrawCommand::Transform(t) => target.transform(*t),
                DrawCommand::Clip(rect) => target.clip_rect(*rect),
                DrawCommand::Path { ops, pen, brush } => {
                    target.draw_path(ops, pen.as_ref(), brush.as_ref())
                }
                DrawCommand::Rectangle { frame, pen, brush } => {
                    target.draw_rectangle(*frame, pen.as_ref(), brush.as_ref())
                }
                DrawCommand::Ellipse { frame, pen, brush } => {
                    target.draw_ellipse(*frame, pen.as_ref(), brush.as_ref())
                }
                DrawCommand::Image {
                    image,
                    frame,
                    alpha,
                } => target.draw_image(image, *frame, *alpha)?,
                DrawCommand::Text {
                    text,
                    frame,
                    font,
                    alignment,
                    pen,
                    brush,
                } => target.draw_text(
                    text,
                    *frame,
                    font,
                    *alignment,
                    pen.as_ref(),
                    brush.as_ref(),
                ),
            }
        }
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn save_state(&mut self) {
        self.state.save();
        self.commands.push(DrawCommand::Save);
    }

    fn restore_state(&mut self) {
        if self.state.restore() {
            self.commands.push(DrawCommand::Restore);
        }
    }

    fn transform(&mut self, transform: Transform) {
        self.state.concat(&transform);
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
        self.commands.push(DrawCommand::Clip(rect));
    }

    fn draw_path(&mut self, ops: &[PathOp], pen: Option<&Pen>, brush: Option<&Brush>) {
        if pen.is_none() && brush.is_none() {
            return;
        }
        if let Err(e) = path::validate(ops) {
            warn!("Dropping path: {}", e);
            return;
        }
        self.commands.push(DrawCommand::Path {
            ops: ops.to_vec(),
            pen: pen.copied(),
            brush: brush.cloned(),
        });
    }

    fn draw_rectangle(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        self.commands.push(DrawCommand::Rectangle {
            frame,
            pen: pen.copied(),
            brush: brush.cloned(),
        });
    }

    fn draw_ellipse(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        self.commands.push(DrawCommand::Ellipse {
            frame,
            pen: pen.copied(),
            brush: brush.cloned(),
        });
    }

    fn draw_image(&mut self, image: &Image, frame: Rect, alpha: f32) -> DrawResult<()> {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            frame,
            alpha: alpha.clamp(0.0, 1.0),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        frame: Rect,
        font: &Font,
        alignment: TextAlignment,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            frame,
            font: font.clone(),
            alignment,
            pen: pen.copied(),
            brush: brush.cloned(),
        });
    }

    fn get_image(&self) -> Image {
        Image::empty()
    }
}
