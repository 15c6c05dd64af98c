// src/dom/node.rs
//! Node model: [`Node`], [`NodeId`], [`NodeKind`] and the [`Element`] trait.

use crate::dom::{CircleNode, GroupNode, LineNode, RectNode, TextInputNode, TextNode};
use crate::render::backend::DrawTarget;
use crate::render::FontMetrics;
use kurbo::{Point, Rect};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// A unique identifier for a node, represented as a UUID.
///
/// Identity is assigned when a node is constructed and never changes, so
/// hover and click bookkeeping can compare nodes without comparing their
/// contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which variant a [`Node`] is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Group,
    Rect,
    Circle,
    Line,
    Text,
    TextInput,
}

/// Serialized attributes of a node, ordered by key.
pub type Attrs = BTreeMap<&'static str, String>;

/// Capabilities shared by every node variant.
pub trait Element {
    fn id(&self) -> NodeId;

    /// Tag name used when serializing.
    fn name(&self) -> &'static str;

    fn attrs(&self) -> Attrs;

    /// One-time setup before the node is drawn or hit-tested. Text is
    /// measured here so bounds are valid before the first frame.
    fn init(&mut self, _fonts: &FontMetrics) {}

    fn draw(&mut self, target: &mut dyn DrawTarget);

    fn contains(&self, pt: Point) -> bool;

    fn bounds(&self) -> Rect;
}

/// A drawable element of the scene tree.
#[derive(Debug)]
pub enum Node {
    Group(GroupNode),
    Rect(RectNode),
    Circle(CircleNode),
    Line(LineNode),
    Text(TextNode),
    TextInput(TextInputNode),
}

macro_rules! dispatch {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::Group($inner) => $body,
            Node::Rect($inner) => $body,
            Node::Circle($inner) => $body,
            Node::Line($inner) => $body,
            Node::Text($inner) => $body,
            Node::TextInput($inner) => $body,
        }
    };
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Rect(_) => NodeKind::Rect,
            Node::Circle(_) => NodeKind::Circle,
            Node::Line(_) => NodeKind::Line,
            Node::Text(_) => NodeKind::Text,
            Node::TextInput(_) => NodeKind::TextInput,
        }
    }

    /// Children visible to traversal. Only groups have any; a text input
    /// keeps its internal shapes to itself.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(g) => &g.children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Node::Group(g) => &mut g.children,
            _ => Default::default(),
        }
    }

    /// Finds the node with the given id in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id() == id {
            return Some(self);
        }
        self.children_mut().iter_mut().find_map(|c| c.find_mut(id))
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Node::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_input(&self) -> Option<&TextInputNode> {
        match self {
            Node::TextInput(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_input_mut(&mut self) -> Option<&mut TextInputNode> {
        match self {
            Node::TextInput(t) => Some(t),
            _ => None,
        }
    }
}

impl Element for Node {
    fn id(&self) -> NodeId {
        dispatch!(self, n => n.id())
    }

    fn name(&self) -> &'static str {
        dispatch!(self, n => n.name())
    }

    fn attrs(&self) -> Attrs {
        dispatch!(self, n => n.attrs())
    }

    fn init(&mut self, fonts: &FontMetrics) {
        dispatch!(self, n => n.init(fonts))
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        dispatch!(self, n => n.draw(target))
    }

    fn contains(&self, pt: Point) -> bool {
        dispatch!(self, n => n.contains(pt))
    }

    fn bounds(&self) -> Rect {
        dispatch!(self, n => n.bounds())
    }
}

impl From<GroupNode> for Node {
    fn from(n: GroupNode) -> Self {
        Node::Group(n)
    }
}

impl From<RectNode> for Node {
    fn from(n: RectNode) -> Self {
        Node::Rect(n)
    }
}

impl From<CircleNode> for Node {
    fn from(n: CircleNode) -> Self {
        Node::Circle(n)
    }
}

impl From<LineNode> for Node {
    fn from(n: LineNode) -> Self {
        Node::Line(n)
    }
}

impl From<TextNode> for Node {
    fn from(n: TextNode) -> Self {
        Node::Text(n)
    }
}

impl From<TextInputNode> for Node {
    fn from(n: TextInputNode) -> Self {
        Node::TextInput(n)
    }
}

/// Formats a coordinate the way attributes carry them.
pub(crate) fn fmt_num(v: f64) -> String {
    format!("{v:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        GroupNode::new(vec![
            RectNode::new(0.0, 0.0, 10.0, 10.0).into(),
            GroupNode::new(vec![CircleNode::new(5.0, 5.0, 2.0).into()]).into(),
        ])
        .into()
    }

    #[test]
    fn ids_are_unique() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn find_locates_nested_nodes() {
        let tree = sample();
        let circle_id = tree.children()[1].children()[0].id();

        let found = tree.find(circle_id).unwrap();
        assert_eq!(found.kind(), NodeKind::Circle);
        assert!(tree.find(NodeId::new()).is_none());
    }

    #[test]
    fn find_mut_allows_editing() {
        let mut tree: Node = GroupNode::new(vec![TextNode::new(0.0, 10.0, "a").into()]).into();
        let id = tree.children()[0].id();

        if let Some(text) = tree.find_mut(id).and_then(Node::as_text_mut) {
            text.value = "b".to_string();
        }
        assert_eq!(tree.children()[0].as_text().unwrap().value, "b");
    }

    #[test]
    fn only_groups_expose_children() {
        let input: Node = TextInputNode::new(0.0, 0.0, 100.0).into();
        assert!(input.children().is_empty());
        assert_eq!(sample().children().len(), 2);
    }
}
