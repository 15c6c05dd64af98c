use crate::dom::node::fmt_num;
use crate::dom::{Attrs, Element, NodeId};
use crate::render::backend::DrawTarget;
use crate::render::Color;
use kurbo::{Point, Rect};

const LINE_WIDTH: f64 = 2.0;

/// Straight line segment. Lines are never hit-testable.
#[derive(Debug, Clone, Default)]
pub struct LineNode {
    id: NodeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Stroke color name. Nothing is drawn when it doesn't resolve.
    pub stroke: String,
}

impl LineNode {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            id: NodeId::new(),
            x1,
            y1,
            x2,
            y2,
            stroke: String::new(),
        }
    }

    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = color.into();
        self
    }
}

impl Element for LineNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "line"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("x1", fmt_num(self.x1));
        attrs.insert("y1", fmt_num(self.y1));
        attrs.insert("x2", fmt_num(self.x2));
        attrs.insert("y2", fmt_num(self.y2));
        if !self.stroke.is_empty() {
            attrs.insert("stroke", self.stroke.clone());
        }
        attrs
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        if let Some(color) = Color::named(&self.stroke) {
            target.stroke_line(
                Point::new(self.x1, self.y1),
                Point::new(self.x2, self.y2),
                color,
                LINE_WIDTH,
            );
        }
    }

    fn contains(&self, _pt: Point) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        Rect::from_points((self.x1, self.y1), (self.x2, self.y2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayItem, RenderList};

    #[test]
    fn never_contains_points() {
        let line = LineNode::new(0.0, 0.0, 10.0, 0.0).stroke("black");
        assert!(!line.contains(Point::new(5.0, 0.0)));
    }

    #[test]
    fn bounds_span_the_endpoints() {
        let line = LineNode::new(10.0, 20.0, 4.0, 2.0);
        assert_eq!(line.bounds(), Rect::new(4.0, 2.0, 10.0, 20.0));
    }

    #[test]
    fn draws_only_with_a_known_stroke() {
        let mut list = RenderList::default();
        LineNode::new(0.0, 0.0, 1.0, 1.0).draw(&mut list);
        assert!(list.items.is_empty());

        LineNode::new(0.0, 0.0, 1.0, 1.0).stroke("green").draw(&mut list);
        assert!(matches!(list.items[0], DisplayItem::Line { width, .. } if width == 2.0));
    }
}
