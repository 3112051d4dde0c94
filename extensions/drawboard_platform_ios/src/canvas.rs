//! Layer-tree canvas
//!
//! Each draw call appends one sublayer to the host container. Rectangles and
//! ellipses are positioned by their offset inside the container, paths carry
//! their geometry as path data. The layer model has no image compositing
//! and no pixel readback.

use drawboard_graphics::path::{self, PathOp};
use drawboard_graphics::{
    Brush, Canvas, Color, DrawError, DrawResult, Font, Image, Pen, Rect, Size, StateStack,
    TextAlignment, Transform,
};
use tracing::{debug, trace, warn};

use crate::layer::{
    alignment_name, color_string, transform_array, Bounds, Geometry, Layer, LayerContainer,
    ShapeLayer, TextLayer,
};

/// Canvas that builds shape layers
pub struct LayerCanvas<'a> {
    container: &'a mut dyn LayerContainer,
    state: StateStack,
    size: Size,
}

impl<'a> LayerCanvas<'a> {
    pub fn new(container: &'a mut dyn LayerContainer, size: Size) -> Self {
        Self {
            container,
            state: StateStack::new(),
            size,
        }
    }

    fn shape(
        &mut self,
        geometry: Geometry,
        left: f32,
        top: f32,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) {
        let layer = ShapeLayer {
            geometry,
            left,
            top,
            fill: brush.map(fill_color),
            stroke: pen.map(|p| color_string(p.color)),
            stroke_width: pen.map_or(0.0, |p| p.width),
            transform: transform_array(&self.state.transform()),
            clip: self.state.clip().map(Bounds::from),
        };
        trace!(geometry = ?layer.geometry, "shape layer");
        self.container.add_sublayer(Layer::Shape(layer));
    }
}

/// Gradients are reduced to their first stop
fn fill_color(brush: &Brush) -> String {
    if !brush.is_solid() {
        debug!("Gradient brush approximated by its first stop");
    }
    color_string(brush.approximate_color())
}

/// Path data for `ops`; arcs become straight lines to their endpoint
pub fn path_data(ops: &[PathOp]) -> String {
    let mut data = String::new();
    for op in ops {
        let segment = match *op {
            PathOp::MoveTo(p) => format!(" M {},{}", p.x, p.y),
            PathOp::LineTo(p) => format!(" L {},{}", p.x, p.y),
            PathOp::ArcTo { point, .. } => format!(" L {},{}", point.x, point.y),
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => format!(
                " C {},{} {},{} {},{}",
                control1.x, control1.y, control2.x, control2.y, point.x, point.y
            ),
            PathOp::Close => " z".to_string(),
        };
        data.push_str(&segment);
    }
    data
}

impl Canvas for LayerCanvas<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn scale(&self) -> f32 {
        1.0
    }

    fn save_state(&mut self) {
        self.state.save();
    }

    fn restore_state(&mut self) {
        if !self.state.restore() {
            trace!("restore_state without matching save ignored");
        }
    }

    fn transform(&mut self, transform: Transform) {
        self.state.concat(&transform);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
    }

    fn draw_path(&mut self, ops: &[PathOp], pen: Option<&Pen>, brush: Option<&Brush>) {
        if pen.is_none() && brush.is_none() {
            return;
        }
        if let Err(e) = path::validate(ops) {
            warn!("Dropping path: {}", e);
            return;
        }
        let geometry = Geometry::Path {
            data: path_data(ops),
            segments: ops.len(),
        };
        self.shape(geometry, 0.0, 0.0, pen, brush);
    }

    fn draw_rectangle(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        let geometry = Geometry::Rect {
            width: frame.width,
            height: frame.height,
        };
        self.shape(geometry, frame.x, frame.y, pen, brush);
    }

    fn draw_ellipse(&mut self, frame: Rect, pen: Option<&Pen>, brush: Option<&Brush>) {
        let geometry = Geometry::Ellipse {
            width: frame.width,
            height: frame.height,
        };
        self.shape(geometry, frame.x, frame.y, pen, brush);
    }

    fn draw_image(&mut self, _image: &Image, _frame: Rect, _alpha: f32) -> DrawResult<()> {
        Err(DrawError::UnsupportedOperation("draw_image on a layer tree"))
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
        let color: Option<Color> = brush
            .map(|b| b.approximate_color())
            .or_else(|| pen.map(|p| p.color));
        let layer = TextLayer {
            text: text.to_string(),
            frame: frame.into(),
            font_family: font.family.clone(),
            font_size: font.size,
            alignment: alignment_name(alignment),
            color: color.map(color_string),
            transform: transform_array(&self.state.transform()),
            clip: self.state.clip().map(Bounds::from),
        };
        trace!(chars = text.len(), "text layer");
        self.container.add_sublayer(Layer::Text(layer));
    }

    fn get_image(&self) -> Image {
        Image::empty()
    }
}
