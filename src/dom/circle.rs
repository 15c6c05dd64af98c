use crate::dom::node::fmt_num;
use crate::dom::{Attrs, Element, NodeId};
use crate::render::backend::DrawTarget;
use crate::render::Color;
use kurbo::{Point, Rect};

/// Filled circle centred on `(x, y)`.
#[derive(Debug, Clone, Default)]
pub struct CircleNode {
    id: NodeId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Fill color name, black when unknown.
    pub fill: String,
}

impl CircleNode {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            id: NodeId::new(),
            x,
            y,
            radius,
            fill: String::new(),
        }
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = color.into();
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Element for CircleNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "circle"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("radius", fmt_num(self.radius));
        attrs.insert("x", fmt_num(self.x));
        attrs.insert("y", fmt_num(self.y));
        if !self.fill.is_empty() {
            attrs.insert("fill", self.fill.clone());
        }
        attrs
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        let color = Color::named(&self.fill).unwrap_or(Color::BLACK);
        target.fill_circle(self.center(), self.radius, color);
    }

    fn contains(&self, pt: Point) -> bool {
        pt.distance(self.center()) <= self.radius
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.x + self.radius,
            self.y + self.radius,
        )
    }
}
