use crate::dom::{Attrs, Element, Node, NodeId};
use crate::render::backend::DrawTarget;
use crate::render::FontMetrics;
use kurbo::{Point, Rect};

/// Ordered container of child nodes, optionally linking somewhere.
///
/// Children are drawn in declaration order, so later children paint over
/// earlier ones.
#[derive(Debug, Default)]
pub struct GroupNode {
    id: NodeId,
    /// Navigation target when anything inside the group is clicked.
    pub href: Option<String>,
    pub children: Vec<Node>,
}

impl GroupNode {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            id: NodeId::new(),
            href: None,
            children,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// The link target, if set and non-empty.
    pub fn link(&self) -> Option<&str> {
        self.href.as_deref().filter(|h| !h.is_empty())
    }
}

impl Element for GroupNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "g"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        if let Some(href) = self.link() {
            attrs.insert("href", href.to_string());
        }
        attrs
    }

    fn init(&mut self, fonts: &FontMetrics) {
        for child in &mut self.children {
            child.init(fonts);
        }
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        for child in &mut self.children {
            child.draw(target);
        }
    }

    fn contains(&self, pt: Point) -> bool {
        self.children.iter().any(|c| c.contains(pt))
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.children.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(first.bounds(), |acc, c| acc.union(c.bounds()))
    }
}
