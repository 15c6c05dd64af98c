// src/dom/text_input.rs
//! Focusable single-line text field with a cursor and a selection.
//!
//! The widget is opaque to traversal: it draws a background, a selection
//! highlight, its value and a caret, but exposes none of them as children.
//! All positions count characters, and text is assumed to be monospace, so
//! the caret sits at `text_start + cursor_pos * char_width`.
//!
//! Editing operations are silent no-ops while the field is unfocused, and
//! index arithmetic is clamped rather than allowed to fail.

use crate::dom::node::fmt_num;
use crate::dom::{Attrs, Element, LineNode, NodeId, RectNode, TextNode};
use crate::render::backend::DrawTarget;
use crate::render::FontMetrics;
use kurbo::{Point, Rect};
use std::fmt;

const HEIGHT: f64 = 30.0;
const TEXT_INSET: f64 = 5.0;
const BASELINE_OFFSET: f64 = 20.0;
const CARET_TOP: f64 = 7.0;
const CARET_BOTTOM: f64 = 21.0;
const SELECTION_COLOR: &str = "pink";
const FOCUS_COLOR: &str = "black";

/// Invoked with the current value when enter is pressed in a focused field.
pub type EnterCallback = Box<dyn FnMut(&str) + Send + Sync>;

pub struct TextInputNode {
    id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Color name of the value text.
    pub text_color: String,

    value: String,
    focused: bool,
    cursor_pos: usize,
    selection_start: Option<usize>,
    on_enter: Option<EnterCallback>,

    // Shadow shapes, refreshed from the state above on every draw.
    background: RectNode,
    selection: RectNode,
    caret: LineNode,
    label: TextNode,
}

impl fmt::Debug for TextInputNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputNode")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("value", &self.value)
            .field("focused", &self.focused)
            .field("cursor_pos", &self.cursor_pos)
            .field("selection_start", &self.selection_start)
            .field("on_enter", &self.on_enter.as_ref().map(|_| "FnMut(&str)"))
            .finish()
    }
}

impl TextInputNode {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        let mut node = Self {
            id: NodeId::new(),
            x,
            y,
            width,
            text_color: String::new(),
            value: String::new(),
            focused: false,
            cursor_pos: 0,
            selection_start: None,
            on_enter: None,
            background: RectNode::default(),
            selection: RectNode::default(),
            caret: LineNode::default(),
            label: TextNode::default(),
        };
        node.layout(&FontMetrics::default());
        node
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_on_enter(&mut self, f: impl FnMut(&str) + Send + Sync + 'static) {
        self.on_enter = Some(Box::new(f));
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value, leaving the cursor at its end and no selection.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor_pos = self.len();
        self.selection_start = None;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn selection_start(&self) -> Option<usize> {
        self.selection_start
    }

    /// Length of the value in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The widget frame; hit-testing and bounds use it.
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + HEIGHT)
    }

    // ---------- Focus ----------

    /// Focuses the field. A non-empty value becomes fully selected.
    pub fn focus(&mut self) {
        self.focused = true;
        if self.value.is_empty() {
            self.cursor_pos = 0;
            self.selection_start = None;
        } else {
            self.cursor_pos = self.len();
            self.selection_start = Some(0);
        }
    }

    pub fn unfocus(&mut self) {
        self.focused = false;
        self.cancel_selection();
    }

    pub fn select_all(&mut self) {
        if !self.focused {
            return;
        }
        self.select(0, self.len());
    }

    /// Selects from `anchor` to `cursor`, both clamped to the value.
    pub fn select(&mut self, anchor: usize, cursor: usize) {
        let len = self.len();
        self.selection_start = Some(anchor.min(len));
        self.cursor_pos = cursor.min(len);
    }

    // ---------- Editing ----------

    /// Inserts `text` at the cursor, replacing the selection if there is one.
    pub fn process_typing(&mut self, text: &str) {
        if !self.focused || text.is_empty() {
            return;
        }
        if self.selection_start.is_some() {
            self.delete_selection();
        }
        let at = self.byte_index(self.cursor_pos);
        self.value.insert_str(at, text);
        self.cursor_pos += text.chars().count();
    }

    pub fn process_backspace(&mut self) {
        if !self.focused || self.value.is_empty() {
            return;
        }
        if self.selection_start.is_some() {
            self.delete_selection();
            return;
        }
        if self.cursor_pos == 0 {
            return;
        }
        let start = self.byte_index(self.cursor_pos - 1);
        let end = self.byte_index(self.cursor_pos);
        self.value.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Submits the value. Returns it (after running the enter callback) when
    /// the field is focused.
    pub fn process_enter(&mut self) -> Option<String> {
        if !self.focused {
            return None;
        }
        if let Some(cb) = self.on_enter.as_mut() {
            cb(&self.value);
        }
        Some(self.value.clone())
    }

    pub fn process_left_key(&mut self, shift_down: bool, super_down: bool) {
        if !self.focused {
            return;
        }
        self.maybe_start_selection(shift_down);
        if super_down {
            self.cursor_pos = 0;
        } else {
            self.cursor_pos = self.cursor_pos.saturating_sub(1);
        }
    }

    pub fn process_right_key(&mut self, shift_down: bool, super_down: bool) {
        if !self.focused {
            return;
        }
        self.maybe_start_selection(shift_down);
        let len = self.len();
        if super_down {
            self.cursor_pos = len;
        } else {
            self.cursor_pos = (self.cursor_pos + 1).min(len);
        }
    }

    /// Anchors a selection at the cursor while shift is held, and drops it
    /// otherwise.
    pub fn maybe_start_selection(&mut self, shift_down: bool) {
        if !shift_down {
            self.cancel_selection();
            return;
        }
        if self.selection_start.is_none() {
            self.selection_start = Some(self.cursor_pos);
        }
    }

    pub fn cancel_selection(&mut self) {
        self.selection_start = None;
    }

    /// The selection as an ascending `(start, end)` range. Empty at the
    /// cursor when nothing is selected.
    pub fn get_selection(&self) -> (usize, usize) {
        match self.selection_start {
            None => (self.cursor_pos, self.cursor_pos),
            Some(start) if start < self.cursor_pos => (start, self.cursor_pos),
            Some(start) => (self.cursor_pos, start),
        }
    }

    pub fn selected_text(&self) -> &str {
        let (start, end) = self.get_selection();
        &self.value[self.byte_index(start)..self.byte_index(end)]
    }

    pub fn delete_selection(&mut self) {
        let (start, end) = self.get_selection();
        let (from, to) = (self.byte_index(start), self.byte_index(end));
        self.value.replace_range(from..to, "");
        self.cancel_selection();
        self.cursor_pos = start;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    // ---------- Layout ----------

    fn text_start(&self) -> f64 {
        self.x + TEXT_INSET
    }

    /// X position of the caret for the current cursor.
    pub fn caret_x(&self, fonts: &FontMetrics) -> f64 {
        self.text_start() + fonts.advance(self.cursor_pos)
    }

    fn layout(&mut self, fonts: &FontMetrics) {
        let focus_color = if self.focused { FOCUS_COLOR } else { "" };

        self.background.x = self.x;
        self.background.y = self.y;
        self.background.width = self.width;
        self.background.height = HEIGHT;
        self.background.stroke = focus_color.to_string();

        self.label.x = self.text_start();
        self.label.y = self.y + BASELINE_OFFSET;
        self.label.value = self.value.clone();
        self.label.fill = self.text_color.clone();
        self.label.measure(fonts);

        let caret_x = self.caret_x(fonts);
        self.caret.x1 = caret_x;
        self.caret.x2 = caret_x;
        self.caret.y1 = self.y + CARET_BOTTOM;
        self.caret.y2 = self.y + CARET_TOP;
        self.caret.stroke = focus_color.to_string();

        if self.selection_start.is_some() {
            let (start, end) = self.get_selection();
            self.selection.fill = SELECTION_COLOR.to_string();
            self.selection.x = self.text_start() + fonts.advance(start);
            self.selection.y = self.y + CARET_TOP;
            self.selection.width = fonts.advance(end - start);
            self.selection.height = fonts.size;
        } else {
            self.selection.fill.clear();
        }
    }
}

impl Element for TextInputNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "textInput"
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("x", fmt_num(self.x));
        attrs.insert("y", fmt_num(self.y));
        attrs.insert("width", fmt_num(self.width));
        attrs.insert("value", self.value.clone());
        attrs.insert("focused", self.focused.to_string());
        if !self.text_color.is_empty() {
            attrs.insert("textColor", self.text_color.clone());
        }
        attrs
    }

    fn init(&mut self, fonts: &FontMetrics) {
        self.layout(fonts);
    }

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        let fonts = target.fonts().clone();
        self.layout(&fonts);

        self.background.draw(target);
        self.selection.draw(target);
        self.label.draw(target);
        self.caret.draw(target);
    }

    fn contains(&self, pt: Point) -> bool {
        self.frame().contains(pt)
    }

    fn bounds(&self) -> Rect {
        self.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayItem, RenderList};
    use std::sync::{Arc, Mutex};

    fn focused(value: &str) -> TextInputNode {
        let mut input = TextInputNode::new(0.0, 0.0, 200.0).with_value(value);
        input.focus();
        input.cancel_selection();
        input
    }

    fn assert_cursor_in_range(input: &TextInputNode) {
        assert!(input.cursor_pos() <= input.len(), "{input:?}");
        if let Some(start) = input.selection_start() {
            assert!(start <= input.len(), "{input:?}");
        }
    }

    #[test]
    fn focus_selects_everything() {
        let mut input = TextInputNode::new(0.0, 0.0, 100.0).with_value("hello");
        input.focus();
        assert!(input.is_focused());
        assert_eq!(input.get_selection(), (0, 5));
        assert_eq!(input.cursor_pos(), 5);

        let mut empty = TextInputNode::new(0.0, 0.0, 100.0);
        empty.focus();
        assert_eq!(empty.cursor_pos(), 0);
        assert_eq!(empty.selection_start(), None);
    }

    #[test]
    fn unfocus_is_idempotent() {
        let mut input = focused("abc");
        input.select_all();
        input.unfocus();
        input.unfocus();
        assert!(!input.is_focused());
        assert_eq!(input.selection_start(), None);
    }

    #[test]
    fn editing_while_unfocused_does_nothing() {
        let mut input = TextInputNode::new(0.0, 0.0, 100.0).with_value("abc");
        input.process_typing("x");
        input.process_backspace();
        input.process_left_key(false, false);
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor_pos(), 3);
        assert_eq!(input.process_enter(), None);
    }

    #[test]
    fn typing_replaces_the_selection() {
        let mut input = TextInputNode::new(0.0, 0.0, 100.0).with_value("old url");
        input.focus();
        input.process_typing("new");
        assert_eq!(input.value(), "new");
        assert_eq!(input.cursor_pos(), 3);
        assert_eq!(input.selection_start(), None);
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut input = focused("held");
        input.process_left_key(false, false);
        input.process_typing("lo worl");
        assert_eq!(input.value(), "hello world");
        assert_eq!(input.cursor_pos(), 10);
    }

    #[test]
    fn backspace_deletes_before_cursor() {
        let mut input = focused("abc");
        input.process_backspace();
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor_pos(), 2);

        input.process_left_key(false, true);
        input.process_backspace();
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn backspace_on_empty_value_is_a_no_op() {
        let mut input = focused("");
        input.process_backspace();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn delete_selection_removes_the_range() {
        let mut input = focused("hello world");
        input.select(3, 10);
        input.delete_selection();
        assert_eq!(input.value(), "held");
        assert_eq!(input.cursor_pos(), 3);
        assert_eq!(input.selection_start(), None);
    }

    #[test]
    fn backwards_selection_is_normalized() {
        let mut input = focused("hello world");
        input.select(10, 3);
        assert_eq!(input.get_selection(), (3, 10));
        assert_eq!(input.selected_text(), "lo worl");
        input.process_backspace();
        assert_eq!(input.value(), "held");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn shift_arrows_extend_selection() {
        let mut input = focused("abcdef");
        input.process_left_key(true, false);
        input.process_left_key(true, false);
        assert_eq!(input.get_selection(), (4, 6));

        input.process_left_key(true, true);
        assert_eq!(input.get_selection(), (0, 6));

        input.process_right_key(false, false);
        assert_eq!(input.selection_start(), None);
        assert_eq!(input.cursor_pos(), 1);
    }

    #[test]
    fn arrows_clamp_at_the_ends() {
        let mut input = focused("ab");
        input.process_right_key(false, false);
        assert_eq!(input.cursor_pos(), 2);
        input.process_left_key(false, true);
        input.process_left_key(false, false);
        assert_eq!(input.cursor_pos(), 0);
        input.process_right_key(false, true);
        assert_eq!(input.cursor_pos(), 2);
    }

    #[test]
    fn cursor_stays_in_range_through_mixed_edits() {
        let mut input = focused("héllo");
        let steps: [fn(&mut TextInputNode); 10] = [
            |i| i.process_left_key(false, false),
            |i| i.process_backspace(),
            |i| i.process_typing("ü"),
            |i| i.process_left_key(true, true),
            |i| i.process_backspace(),
            |i| i.process_backspace(),
            |i| i.process_right_key(false, false),
            |i| i.process_typing("xyz"),
            |i| i.process_right_key(true, true),
            |i| i.process_left_key(false, false),
        ];
        for step in steps.iter().cycle().take(40) {
            step(&mut input);
            assert_cursor_in_range(&input);
        }
    }

    #[test]
    fn multibyte_characters_are_single_positions() {
        let mut input = focused("añb");
        input.process_left_key(false, false);
        input.process_backspace();
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor_pos(), 1);
    }

    #[test]
    fn enter_runs_callback_and_returns_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut input = focused("http://example.com/");
        input.set_on_enter(move |v| sink.lock().unwrap().push(v.to_string()));

        assert_eq!(input.process_enter().as_deref(), Some("http://example.com/"));
        assert_eq!(*seen.lock().unwrap(), vec!["http://example.com/".to_string()]);
    }

    #[test]
    fn hit_testing_uses_the_frame() {
        let input = TextInputNode::new(170.0, 10.0, 100.0);
        assert!(input.contains(Point::new(171.0, 11.0)));
        assert!(!input.contains(Point::new(171.0, 40.0)));
        assert_eq!(input.bounds(), Rect::new(170.0, 10.0, 270.0, 40.0));
    }

    #[test]
    fn draw_positions_caret_and_selection() {
        let mut input = TextInputNode::new(10.0, 0.0, 200.0).with_value("hello");
        input.focus();
        input.process_left_key(false, false);
        input.process_right_key(true, false);

        let mut list = RenderList::default();
        input.draw(&mut list);

        // selection covers the last character, caret after it
        let selection = list.items.iter().find_map(|item| match item {
            DisplayItem::Rect { x, w, .. } => Some((*x, *w)),
            _ => None,
        });
        assert_eq!(selection, Some((15.0 + 28.0, 7.0)));

        let caret = list.items.iter().find_map(|item| match item {
            DisplayItem::Line { x1, y1, y2, .. } => Some((*x1, *y1, *y2)),
            _ => None,
        });
        assert_eq!(caret, Some((15.0 + 35.0, 21.0, 7.0)));
        assert_eq!(list.texts(), vec!["hello"]);
        assert!(list
            .items
            .iter()
            .any(|item| matches!(item, DisplayItem::StrokeRect { .. })));
    }

    #[test]
    fn unfocused_field_draws_no_caret() {
        let mut input = TextInputNode::new(0.0, 0.0, 100.0).with_value("x");
        let mut list = RenderList::default();
        input.draw(&mut list);
        assert!(!list.items.iter().any(|i| matches!(i, DisplayItem::Line { .. })));
        assert_eq!(list.texts(), vec!["x"]);
    }
}
