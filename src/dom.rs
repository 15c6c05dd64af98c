//! Retained scene graph for vector documents.
//!
//! A document is a tree of [`Node`]s: groups, rectangles, circles, lines,
//! text runs and text inputs. Nodes know how to draw themselves onto a
//! [`DrawTarget`](crate::render::backend::DrawTarget), whether they contain a
//! point, and which attributes they serialize to.

mod node;
pub use node::*;

mod circle;
mod group;
mod line;
mod rect;
mod text;
mod text_input;

pub use circle::CircleNode;
pub use group::GroupNode;
pub use line::LineNode;
pub use rect::RectNode;
pub use text::TextNode;
pub use text_input::{EnterCallback, TextInputNode};

mod visit;
pub use visit::{all_nodes, simple_visit, visit};

mod pick;
pub use pick::{pick, pick_ids};

mod format;
pub use format::{format, format_without_children};

mod parse;
pub use parse::{parse, ParseError, MAX_DEPTH};
