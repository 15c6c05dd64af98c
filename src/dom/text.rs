use crate::dom::node::fmt_num;
use crate::dom::{Attrs, Element, NodeId};
use crate::render::backend::DrawTarget;
use crate::render::{Color, FontMetrics};
use kurbo::{Point, Rect};

/// A run of text with its baseline starting at `(x, y)`.
///
/// Bounds come from measuring the value with the renderer's font metrics.
/// They are measured in [`Element::init`] and again on every draw.
#[derive(Debug, Clone, Default)]
pub struct TextNode {
    id: NodeId,
    pub x: f64,
    pub y: f64,
    pub value: String,
    /// Fill color name, black when unknown.
    pub fill: String,
    bounds: Rect,
}

impl TextNode {
    pub fn new(x: f64, y: f64, value: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            x,
            y,
            value: value.into(),
            fill: String::new(),
            bounds: Rect::ZERO,
        }
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = color.into();
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Re-measures the bounds after the value or position changed.
    pub fn measure(&mut self, fonts: &FontMetrics) {
        self.bounds = fonts.measure(&self.value, self.origin());
    }
}

impl Element for TextNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("value", self.value.clone());
        attrs.insert("x", fmt_num(self.x));
        attrs.insert("y", fmt_num(self.y));
        if !self.fill.is_empty() {
            attrs.insert("fill", self.fill.clone());
        }
        attrs
    }

    fn init(&mut self, fonts: &FontMetrics) {
        self.measure(fonts);
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        let color = Color::named(&self.fill).unwrap_or(Color::BLACK);
        self.bounds = target.fill_text(&self.value, self.origin(), color);
    }

    fn contains(&self, pt: Point) -> bool {
        self.bounds.contains(pt)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
