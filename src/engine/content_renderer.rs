//! Per-page scene owner and the hover/click interaction machine.
//!
//! A [`ContentRenderer`] owns a root [`Node`] and derives hover and click
//! transitions every frame from a sampled [`PointerState`]. There are no
//! native hover or click events: each frame the tree is picked at the pointer
//! position and the result is compared with the previous frame.
//!
//! Per node the machine has three states: idle, hovered and pressed. A click
//! fires for the intersection of the nodes under the pointer when the button
//! went down and the nodes under the pointer when it came back up, so
//! dragging off a node before releasing cancels its click while its
//! ancestors that are still under the pointer still receive one.

use crate::dom::{pick_ids, Element, Node, NodeId, RectNode};
use crate::input::PointerState;
use crate::render::backend::DrawTarget;
use crate::render::FontHandle;
use std::collections::HashMap;

/// Callback fired with the id of the node the transition happened on.
pub type NodeCallback = Box<dyn FnMut(NodeId) + Send>;

#[derive(Default)]
struct Callbacks {
    mouse_over: Option<NodeCallback>,
    mouse_out: Option<NodeCallback>,
    click: Option<NodeCallback>,
}

/// Transitions produced by one [`ContentRenderer::process_click_state`] step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    /// Nodes the pointer moved onto this frame, in pick order.
    pub entered: Vec<NodeId>,
    /// Nodes the pointer left this frame.
    pub exited: Vec<NodeId>,
    /// Nodes clicked this frame: deepest first, enclosing groups after.
    pub clicked: Vec<NodeId>,
}

impl Interaction {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty() && self.clicked.is_empty()
    }
}

pub struct ContentRenderer {
    root: Node,
    fonts: FontHandle,
    /// Nodes the pointer is currently over.
    mouse_over: Vec<NodeId>,
    /// Nodes under the pointer when the button went down.
    mouse_down: Vec<NodeId>,
    highlighted: Option<NodeId>,
    callbacks: HashMap<NodeId, Callbacks>,
}

impl std::fmt::Debug for ContentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRenderer")
            .field("root", &self.root.id())
            .field("mouse_over", &self.mouse_over)
            .field("mouse_down", &self.mouse_down)
            .field("highlighted", &self.highlighted)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl ContentRenderer {
    /// Takes ownership of `root` and initializes it with `fonts`.
    pub fn new(mut root: Node, fonts: FontHandle) -> Self {
        root.init(&fonts);
        Self {
            root,
            fonts,
            mouse_over: Vec::new(),
            mouse_down: Vec::new(),
            highlighted: None,
            callbacks: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable access to the tree. Nodes must not be replaced wholesale
    /// through this, since hover and callback bookkeeping is keyed by id.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn fonts(&self) -> &FontHandle {
        &self.fonts
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    pub fn mouse_over_nodes(&self) -> &[NodeId] {
        &self.mouse_over
    }

    pub fn mouse_down_nodes(&self) -> &[NodeId] {
        &self.mouse_down
    }

    pub fn on_mouse_over(&mut self, id: NodeId, f: impl FnMut(NodeId) + Send + 'static) {
        self.callbacks.entry(id).or_default().mouse_over = Some(Box::new(f));
    }

    pub fn on_mouse_out(&mut self, id: NodeId, f: impl FnMut(NodeId) + Send + 'static) {
        self.callbacks.entry(id).or_default().mouse_out = Some(Box::new(f));
    }

    pub fn on_click(&mut self, id: NodeId, f: impl FnMut(NodeId) + Send + 'static) {
        self.callbacks.entry(id).or_default().click = Some(Box::new(f));
    }

    pub fn highlighted_node(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn set_highlighted_node(&mut self, id: Option<NodeId>) {
        self.highlighted = id;
    }

    /// Advances the interaction machine by one frame.
    pub fn process_click_state(&mut self, pointer: &PointerState) -> Interaction {
        let hovered = pick_ids(&self.root, pointer.position);
        let mut result = Interaction::default();

        // Leave transitions
        let mut still_over = Vec::with_capacity(self.mouse_over.len());
        for id in std::mem::take(&mut self.mouse_over) {
            if hovered.contains(&id) {
                still_over.push(id);
            } else {
                self.fire(id, |c| &mut c.mouse_out);
                result.exited.push(id);
            }
        }
        self.mouse_over = still_over;

        // Enter transitions
        for &id in &hovered {
            if !self.mouse_over.contains(&id) {
                self.mouse_over.push(id);
                result.entered.push(id);
                self.fire(id, |c| &mut c.mouse_over);
            }
        }

        if pointer.button_just_pressed {
            log::debug!("click begin over {} node(s)", hovered.len());
            self.mouse_down = hovered;
        } else if !pointer.button_down && !self.mouse_down.is_empty() {
            let pressed = std::mem::take(&mut self.mouse_down);
            for id in hovered {
                if pressed.contains(&id) {
                    self.fire(id, |c| &mut c.click);
                    result.clicked.push(id);
                }
            }
            log::debug!("click complete on {} node(s)", result.clicked.len());
        }

        result
    }

    fn fire(&mut self, id: NodeId, slot: impl FnOnce(&mut Callbacks) -> &mut Option<NodeCallback>) {
        if let Some(cb) = self.callbacks.get_mut(&id).and_then(|c| slot(c).as_mut()) {
            cb(id);
        }
    }

    /// Draws the tree, then a red outline around the highlighted node.
    pub fn draw(&mut self, target: &mut dyn DrawTarget) {
        self.root.draw(target);

        let Some(id) = self.highlighted else {
            return;
        };
        match self.root.find(id) {
            Some(node) => {
                let mut overlay = RectNode::from_bounds(node.bounds()).stroke("red");
                overlay.draw(target);
            }
            None => log::trace!("highlighted node {id} is not in the tree"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{CircleNode, GroupNode, RectNode, TextNode};
    use crate::render::{Color, DisplayItem, FontMetrics, RenderList};
    use std::sync::{Arc, Mutex};

    fn fonts() -> FontHandle {
        FontMetrics::default().into_handle()
    }

    fn counter() -> (Arc<Mutex<Vec<NodeId>>>, impl FnMut(NodeId) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |id| sink.lock().unwrap().push(id))
    }

    #[test]
    fn click_requires_release_over_the_pressed_node() {
        let rect: Node = RectNode::new(0.0, 0.0, 10.0, 10.0).fill("blue").into();
        let rect_id = rect.id();
        let mut cr = ContentRenderer::new(GroupNode::new(vec![rect]).into(), fonts());
        let (calls, cb) = counter();
        cr.on_click(rect_id, cb);

        // Press over the rect, drag off, release elsewhere.
        cr.process_click_state(&PointerState::pressed(5.0, 5.0));
        cr.process_click_state(&PointerState::held(50.0, 50.0));
        let r = cr.process_click_state(&PointerState::at(50.0, 50.0));
        assert!(r.clicked.is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(cr.mouse_down_nodes().is_empty());

        // Press and release in place.
        cr.process_click_state(&PointerState::pressed(5.0, 5.0));
        let r = cr.process_click_state(&PointerState::at(5.0, 5.0));
        assert_eq!(r.clicked, vec![rect_id, cr.root().id()]);
        assert_eq!(*calls.lock().unwrap(), vec![rect_id]);
    }

    #[test]
    fn click_fires_for_intersection_of_press_and_release_sets() {
        // Drag from the circle to the rect inside the same group: only the
        // group was under the pointer at both ends.
        let circle: Node = CircleNode::new(5.0, 5.0, 5.0).into();
        let rect: Node = RectNode::new(20.0, 0.0, 10.0, 10.0).into();
        let (circle_id, rect_id) = (circle.id(), rect.id());
        let mut cr = ContentRenderer::new(GroupNode::new(vec![circle, rect]).into(), fonts());
        let group_id = cr.root().id();

        cr.process_click_state(&PointerState::pressed(5.0, 5.0));
        let r = cr.process_click_state(&PointerState::at(25.0, 5.0));
        assert_eq!(r.clicked, vec![group_id]);
        assert!(!r.clicked.contains(&circle_id));
        assert!(!r.clicked.contains(&rect_id));
    }

    #[test]
    fn hover_transitions_fire_once() {
        let rect: Node = RectNode::new(0.0, 0.0, 10.0, 10.0).into();
        let rect_id = rect.id();
        let mut cr = ContentRenderer::new(rect, fonts());
        let (overs, over_cb) = counter();
        let (outs, out_cb) = counter();
        cr.on_mouse_over(rect_id, over_cb);
        cr.on_mouse_out(rect_id, out_cb);

        for _ in 0..3 {
            cr.process_click_state(&PointerState::at(5.0, 5.0));
        }
        assert_eq!(overs.lock().unwrap().len(), 1);
        assert!(outs.lock().unwrap().is_empty());
        assert_eq!(cr.mouse_over_nodes(), &[rect_id]);

        let mut exited = Vec::new();
        for _ in 0..3 {
            exited.extend(cr.process_click_state(&PointerState::at(50.0, 5.0)).exited);
        }
        assert_eq!(exited, vec![rect_id]);
        assert_eq!(overs.lock().unwrap().len(), 1);
        assert_eq!(outs.lock().unwrap().len(), 1);
        assert!(cr.mouse_over_nodes().is_empty());
    }

    #[test]
    fn unchanged_pointer_yields_empty_interaction() {
        let mut cr = ContentRenderer::new(RectNode::new(0.0, 0.0, 10.0, 10.0).into(), fonts());
        assert!(!cr.process_click_state(&PointerState::at(1.0, 1.0)).is_empty());
        assert!(cr.process_click_state(&PointerState::at(1.0, 1.0)).is_empty());
    }

    #[test]
    fn highlight_overlay_uses_node_bounds() {
        let text: Node = TextNode::new(10.0, 20.0, "link").into();
        let text_id = text.id();
        let mut cr = ContentRenderer::new(GroupNode::new(vec![text]).into(), fonts());
        cr.set_highlighted_node(Some(text_id));

        let mut list = RenderList::new(fonts());
        cr.draw(&mut list);

        let last = list.items.last().cloned();
        assert_eq!(
            last,
            Some(DisplayItem::StrokeRect {
                x: 10.0,
                y: 7.0,
                w: 28.0,
                h: 13.0,
                color: Color::RED,
                width: 1.0,
            })
        );
    }

    #[test]
    fn highlight_of_unknown_node_draws_nothing_extra() {
        let mut cr = ContentRenderer::new(RectNode::new(0.0, 0.0, 1.0, 1.0).fill("black").into(), fonts());
        cr.set_highlighted_node(Some(NodeId::new()));
        let mut list = RenderList::new(fonts());
        cr.draw(&mut list);
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn text_is_hit_testable_before_first_draw() {
        let text: Node = TextNode::new(10.0, 20.0, "link").into();
        let text_id = text.id();
        let mut cr = ContentRenderer::new(text, fonts());
        let r = cr.process_click_state(&PointerState::at(12.0, 15.0));
        assert_eq!(r.entered, vec![text_id]);
    }
}
