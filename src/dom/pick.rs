use crate::dom::{Element, Node, NodeId};
use kurbo::Point;

/// Hit-tests `node` at `pt`.
///
/// Returns every node containing the point, depth first: leaves in
/// declaration order, each group after its matching descendants. Lines never
/// match. A point over nothing yields an empty list.
pub fn pick(node: &Node, pt: Point) -> Vec<&Node> {
    let mut out = Vec::new();
    pick_into(node, pt, &mut out);
    out
}

/// Like [`pick`], returning node ids.
pub fn pick_ids(node: &Node, pt: Point) -> Vec<NodeId> {
    pick(node, pt).into_iter().map(|n| n.id()).collect()
}

fn pick_into<'a>(node: &'a Node, pt: Point, out: &mut Vec<&'a Node>) {
    match node {
        Node::Group(group) => {
            let before = out.len();
            for child in &group.children {
                pick_into(child, pt, out);
            }
            if out.len() > before {
                out.push(node);
            }
        }
        _ => {
            if node.contains(pt) {
                out.push(node);
            }
        }
    }
}
