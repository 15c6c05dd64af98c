use crate::dom::Node;

/// Visitor callback: receives a node and its depth (0 for the root).
pub type VisitFn<'v, 'a> = &'v mut dyn FnMut(&'a Node, usize);

/// Walks `tree` depth-first, calling `before` on the way down and `after`
/// once a node's children have been visited. Either callback may be absent.
pub fn visit<'a>(tree: &'a Node, mut before: Option<VisitFn<'_, 'a>>, mut after: Option<VisitFn<'_, 'a>>) {
    walk(tree, 0, &mut before, &mut after);
}

fn walk<'a>(
    node: &'a Node,
    depth: usize,
    before: &mut Option<VisitFn<'_, 'a>>,
    after: &mut Option<VisitFn<'_, 'a>>,
) {
    if let Some(f) = before.as_mut() {
        f(node, depth);
    }
    for child in node.children() {
        walk(child, depth + 1, before, after);
    }
    if let Some(f) = after.as_mut() {
        f(node, depth);
    }
}

/// Pre-order traversal.
pub fn simple_visit<'a>(tree: &'a Node, mut f: impl FnMut(&'a Node, usize)) {
    visit(tree, Some(&mut f), None);
}

/// Every node of the tree in document order.
pub fn all_nodes(tree: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    simple_visit(tree, |n, _| out.push(n));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{CircleNode, Element, GroupNode, RectNode, TextInputNode};

    fn tree() -> Node {
        GroupNode::new(vec![
            RectNode::new(0.0, 0.0, 1.0, 1.0).into(),
            GroupNode::new(vec![CircleNode::new(0.0, 0.0, 1.0).into()]).into(),
            TextInputNode::new(0.0, 0.0, 10.0).into(),
        ])
        .into()
    }

    #[test]
    fn before_and_after_see_depths() {
        let tree = tree();
        let mut events = Vec::new();
        {
            let mut before = |n: &Node, d: usize| events.push(format!("+{}@{d}", n.name()));
            visit(&tree, Some(&mut before), None);
        }
        let mut closes = Vec::new();
        let mut after = |n: &Node, d: usize| closes.push(format!("-{}@{d}", n.name()));
        visit(&tree, None, Some(&mut after));

        assert_eq!(events, ["+g@0", "+rect@1", "+g@1", "+circle@2", "+textInput@1"]);
        assert_eq!(closes, ["-rect@1", "-circle@2", "-g@1", "-textInput@1", "-g@0"]);
    }

    #[test]
    fn all_nodes_is_document_order() {
        let tree = tree();
        let names: Vec<_> = all_nodes(&tree).iter().map(|n| n.name()).collect();
        assert_eq!(names, ["g", "rect", "g", "circle", "textInput"]);
    }
}
