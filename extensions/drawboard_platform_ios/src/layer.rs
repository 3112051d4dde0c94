//! Retained layer model
//!
//! Mirrors the `CAShapeLayer`/`CATextLayer` properties a drawing pass sets:
//! geometry, position, fill and stroke colours, the affine transform and the
//! clip in effect when the layer was created. Colours are stored as
//! `#RRGGBBAA` strings so a tree can be dumped as JSON.

use drawboard_graphics::{Color, Rect, TextAlignment, Transform};
use serde::Serialize;
use tracing::trace;

/// Layer-space rectangle
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Shape geometry
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// SVG-style path data in view coordinates
    Path { data: String, segments: usize },
    Rect { width: f32, height: f32 },
    Ellipse { width: f32, height: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeLayer {
    pub geometry: Geometry,
    /// Offset of the layer inside its container
    pub left: f32,
    pub top: f32,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub transform: [f32; 6],
    pub clip: Option<Bounds>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextLayer {
    pub text: String,
    pub frame: Bounds,
    pub font_family: String,
    pub font_size: f32,
    pub alignment: &'static str,
    pub color: Option<String>,
    pub transform: [f32; 6],
    pub clip: Option<Bounds>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Shape(ShapeLayer),
    Text(TextLayer),
}

impl Layer {
    pub fn as_shape(&self) -> Option<&ShapeLayer> {
        match self {
            Layer::Shape(shape) => Some(shape),
            Layer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            Layer::Text(text) => Some(text),
            Layer::Shape(_) => None,
        }
    }
}

pub(crate) fn color_string(color: Color) -> String {
    color.to_hex_string()
}

pub(crate) fn transform_array(transform: &Transform) -> [f32; 6] {
    transform.to_array()
}

pub(crate) fn alignment_name(alignment: TextAlignment) -> &'static str {
    match alignment {
        TextAlignment::Left => "left",
        TextAlignment::Center => "center",
        TextAlignment::Right => "right",
        TextAlignment::Justified => "justified",
    }
}

/// The host layer a surface appends sublayers to
pub trait LayerContainer {
    fn add_sublayer(&mut self, layer: Layer);

    fn remove_all_sublayers(&mut self);

    /// Clip sublayers to `bounds`, `None` to draw unclipped
    fn set_mask(&mut self, bounds: Option<Rect>);

    fn set_background(&mut self, color: Option<Color>);

    /// Whether the layer is composited as opaque
    fn set_opaque(&mut self, opaque: bool);

    fn sublayer_count(&self) -> usize;
}

/// In-memory layer container
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LayerTree {
    sublayers: Vec<Layer>,
    mask: Option<Bounds>,
    background: Option<String>,
    opaque: bool,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sublayers(&self) -> &[Layer] {
        &self.sublayers
    }

    pub fn mask(&self) -> Option<Bounds> {
        self.mask
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

impl LayerContainer for LayerTree {
    fn add_sublayer(&mut self, layer: Layer) {
        trace!(index = self.sublayers.len(), "sublayer added");
        self.sublayers.push(layer);
    }

    fn remove_all_sublayers(&mut self) {
        self.sublayers.clear();
    }

    fn set_mask(&mut self, bounds: Option<Rect>) {
        self.mask = bounds.map(Bounds::from);
    }

    fn set_background(&mut self, color: Option<Color>) {
        self.background = color.map(color_string);
    }

    fn set_opaque(&mut self, opaque: bool) {
        self.opaque = opaque;
    }

    fn sublayer_count(&self) -> usize {
        self.sublayers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_graphics::Colors;

    #[test]
    fn test_tree_collects_and_clears() {
        let mut tree = LayerTree::new();
        tree.add_sublayer(Layer::Shape(ShapeLayer {
            geometry: Geometry::Rect {
                width: 10.0,
                height: 5.0,
            },
            left: 1.0,
            top: 2.0,
            fill: Some(color_string(Colors::RED)),
            stroke: None,
            stroke_width: 0.0,
            transform: transform_array(&Transform::IDENTITY),
            clip: None,
        }));
        assert_eq!(tree.sublayer_count(), 1);
        assert!(tree.sublayers()[0].as_shape().is_some());
        tree.remove_all_sublayers();
        assert_eq!(tree.sublayer_count(), 0);
    }

    #[test]
    fn test_tree_serializes_tagged_layers() {
        let mut tree = LayerTree::new();
        tree.set_background(Some(Colors::WHITE));
        tree.add_sublayer(Layer::Shape(ShapeLayer {
            geometry: Geometry::Ellipse {
                width: 4.0,
                height: 4.0,
            },
            left: 0.0,
            top: 0.0,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            transform: transform_array(&Transform::IDENTITY),
            clip: None,
        }));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["sublayers"][0]["type"], "shape");
        assert_eq!(json["sublayers"][0]["geometry"]["kind"], "ellipse");
        assert!(json["background"].is_string());
    }
}
