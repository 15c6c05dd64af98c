use crate::dom::node::fmt_num;
use crate::dom::{Attrs, Element, NodeId};
use crate::render::backend::DrawTarget;
use crate::render::Color;
use kurbo::{Point, Rect};

/// Axis-aligned rectangle with an optional fill and stroke.
#[derive(Debug, Clone, Default)]
pub struct RectNode {
    id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fill color name. Unknown or empty names are not painted.
    pub fill: String,
    /// Stroke color name. Unknown or empty names are not painted.
    pub stroke: String,
    /// Fill transparency in `[0, 1]`.
    pub transparency: f64,
}

impl RectNode {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: NodeId::new(),
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    /// A rectangle covering `bounds`, with no paint set.
    pub fn from_bounds(bounds: Rect) -> Self {
        Self::new(bounds.x0, bounds.y0, bounds.width(), bounds.height())
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = color.into();
        self
    }

    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = color.into();
        self
    }

    pub fn transparency(mut self, t: f64) -> Self {
        self.transparency = t;
        self
    }
}

impl Element for RectNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "rect"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("x", fmt_num(self.x));
        attrs.insert("y", fmt_num(self.y));
        attrs.insert("width", fmt_num(self.width));
        attrs.insert("height", fmt_num(self.height));
        if !self.fill.is_empty() {
            attrs.insert("fill", self.fill.clone());
        }
        if !self.stroke.is_empty() {
            attrs.insert("stroke", self.stroke.clone());
        }
        if self.transparency != 0.0 {
            attrs.insert("transparency", fmt_num(self.transparency));
        }
        attrs
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        let rect = self.bounds();
        if let Some(color) = Color::named(&self.fill) {
            target.fill_rect(rect, color.with_transparency(self.transparency));
        }
        if let Some(color) = Color::named(&self.stroke) {
            target.stroke_rect(rect, color, 1.0);
        }
    }

    fn contains(&self, pt: Point) -> bool {
        self.bounds().contains(pt)
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayItem, RenderList};

    #[test]
    fn contains_is_half_open() {
        let rect = RectNode::new(10.0, 10.0, 20.0, 10.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.9, 19.9)));
        assert!(!rect.contains(Point::new(30.0, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 20.0)));
    }

    #[test]
    fn unknown_colors_are_not_painted() {
        let mut list = RenderList::default();
        RectNode::new(0.0, 0.0, 5.0, 5.0).fill("nope").draw(&mut list);
        assert!(list.items.is_empty());

        RectNode::new(0.0, 0.0, 5.0, 5.0)
            .fill("blue")
            .stroke("black")
            .draw(&mut list);
        assert_eq!(list.items.len(), 2);
        assert!(matches!(list.items[1], DisplayItem::StrokeRect { .. }));
    }

    #[test]
    fn transparency_applies_to_fill() {
        let mut list = RenderList::default();
        RectNode::new(0.0, 0.0, 5.0, 5.0)
            .fill("red")
            .transparency(0.25)
            .draw(&mut list);
        match &list.items[0] {
            DisplayItem::Rect { color, .. } => assert_eq!(color.a, 0.75),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn from_bounds_round_trips_geometry() {
        let bounds = Rect::new(1.0, 2.0, 11.0, 7.0);
        assert_eq!(RectNode::from_bounds(bounds).bounds(), bounds);
    }
}
