//! Text parameters

use crate::geometry::Rect;

/// Font selection
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name, or a generic name such as `sans-serif`
    pub family: String,
    /// Size in view units
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 16.0)
    }
}

/// Horizontal text alignment within a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch inter-word spacing to fill the frame (single line)
    Justified,
}

impl TextAlignment {
    /// X offset of a line of `line_width` inside `frame`
    ///
    /// Justified text starts at the left edge; callers distribute the slack.
    pub fn line_start(&self, frame: Rect, line_width: f32) -> f32 {
        match self {
            TextAlignment::Left | TextAlignment::Justified => frame.x,
            TextAlignment::Center => frame.x + (frame.width - line_width) / 2.0,
            TextAlignment::Right => frame.right() - line_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_start() {
        let frame = Rect::new(10.0, 0.0, 100.0, 20.0);
        assert_eq!(TextAlignment::Left.line_start(frame, 40.0), 10.0);
        assert_eq!(TextAlignment::Center.line_start(frame, 40.0), 40.0);
        assert_eq!(TextAlignment::Right.line_start(frame, 40.0), 70.0);
        assert_eq!(TextAlignment::Justified.line_start(frame, 40.0), 10.0);
    }
}
