//! DOM inspector.
//!
//! Lists the current page's tree one tag per line, indented by depth.
//! Hovering a line highlights the matching node on the page, and the lines
//! of the highlighted node are drawn in red.

use crate::dom::{format_without_children, visit, Element, GroupNode, Node, NodeId, TextNode};
use crate::engine::{BrowserPage, ContentRenderer, PageId};
use crate::input::PointerState;
use crate::render::backend::DrawTarget;
use crate::render::FontHandle;
use std::cell::RefCell;
use std::collections::HashMap;

const INDENT: &str = "  ";
const HIGHLIGHT_COLOR: &str = "red";

pub struct Devtools {
    fonts: FontHandle,
    renderer: ContentRenderer,
    /// Listing line id to the page node it describes.
    lines: HashMap<NodeId, NodeId>,
    /// Page and tree epoch the listing was built from.
    built_from: Option<(PageId, u64)>,
}

impl std::fmt::Debug for Devtools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Devtools")
            .field("lines", &self.lines.len())
            .field("built_from", &self.built_from)
            .finish()
    }
}

impl Devtools {
    pub fn new(fonts: FontHandle) -> Self {
        Self {
            renderer: ContentRenderer::new(GroupNode::default().into(), fonts.clone()),
            fonts,
            lines: HashMap::new(),
            built_from: None,
        }
    }

    /// The listing, in display order.
    pub fn lines(&self) -> Vec<&str> {
        self.renderer
            .root()
            .children()
            .iter()
            .filter_map(|n| n.as_text().map(|t| t.value.as_str()))
            .collect()
    }

    /// Rebuilds the listing when `page` holds a different tree than last time.
    pub fn refresh(&mut self, page: &BrowserPage) {
        let key = (page.id(), page.epoch());
        if self.built_from == Some(key) {
            return;
        }
        self.built_from = Some(key);
        self.lines.clear();

        let mut group = GroupNode::default();
        if let Some(root) = page.root() {
            let size = self.fonts.size;
            let entries: RefCell<Vec<(NodeId, String)>> = RefCell::new(Vec::new());
            visit(
                root,
                Some(&mut |n: &Node, depth: usize| {
                    let line = format!("{}{}", INDENT.repeat(depth), format_without_children(n));
                    entries.borrow_mut().push((n.id(), line));
                }),
                Some(&mut |n: &Node, depth: usize| {
                    if n.children().is_empty() {
                        return;
                    }
                    let line = format!("{}</{}>", INDENT.repeat(depth), n.name());
                    entries.borrow_mut().push((n.id(), line));
                }),
            );

            for (i, (node_id, value)) in entries.into_inner().into_iter().enumerate() {
                let text = TextNode::new(0.0, (i + 1) as f64 * size, value);
                self.lines.insert(text.id(), node_id);
                group.push(text);
            }
        }

        log::debug!("devtools listing rebuilt with {} line(s)", self.lines.len());
        self.renderer = ContentRenderer::new(group.into(), self.fonts.clone());
    }

    /// Steps hover over the listing and mirrors it as the page highlight.
    pub fn process_mouse_events(&mut self, pointer: &PointerState, page: &mut BrowserPage) {
        self.refresh(page);
        let interaction = self.renderer.process_click_state(pointer);
        let Some(page_renderer) = page.renderer_mut() else {
            return;
        };

        for line in &interaction.exited {
            if let Some(&node) = self.lines.get(line) {
                if page_renderer.highlighted_node() == Some(node) {
                    page_renderer.set_highlighted_node(None);
                }
            }
        }
        for line in &interaction.entered {
            if let Some(&node) = self.lines.get(line) {
                page_renderer.set_highlighted_node(Some(node));
            }
        }
    }

    pub fn draw(&mut self, page: &BrowserPage, target: &mut dyn DrawTarget) {
        self.refresh(page);
        let highlighted = page.renderer().and_then(ContentRenderer::highlighted_node);

        for (line, node) in &self.lines {
            if let Some(text) = self.renderer.find_mut(*line).and_then(Node::as_text_mut) {
                text.fill = if Some(*node) == highlighted {
                    HIGHLIGHT_COLOR.to_string()
                } else {
                    String::new()
                };
            }
        }
        self.renderer.draw(target);
    }
}
