//! Canonical textual form of a node tree.
//!
//! Attributes are written in key order with Go-literal quoting, children are
//! indented two spaces per level, and childless nodes use the self-closing
//! form. [`parse`](crate::dom::parse) accepts everything produced here.

use crate::dom::{Element, Node};
use std::fmt::Write;

const INDENT: &str = "  ";

pub fn format(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

/// The opening tag of `node` alone, self-closed when it has no children.
pub fn format_without_children(node: &Node) -> String {
    let mut out = String::new();
    write_open(&mut out, node);
    if node.children().is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
    }
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    write_open(out, node);
    let children = node.children();
    if children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push_str(">\n");
    for child in children {
        out.push_str(&INDENT.repeat(depth + 1));
        write_node(out, child, depth + 1);
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
    let _ = write!(out, "</{}>", node.name());
}

fn write_open(out: &mut String, node: &Node) {
    out.push('<');
    out.push_str(node.name());
    for (key, value) in node.attrs() {
        let _ = write!(out, " {key}={}", quote(&value));
    }
}

/// Double-quoted literal with backslash escapes.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
