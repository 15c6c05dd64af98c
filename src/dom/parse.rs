//! Document parser.
//!
//! Reads the XML-like document dialect into a [`Node`] tree. The grammar is
//! small: elements with quoted attributes, character data, comments, an
//! optional prolog and doctype. Attribute values use backslash escapes, the
//! same way [`format`](crate::dom::format) writes them. Unknown elements
//! (with their subtrees) and unknown attributes are skipped.

use crate::dom::{CircleNode, GroupNode, LineNode, Node, RectNode, TextInputNode, TextNode};

/// Deepest element nesting a document may use. The tree walkers recurse once
/// per level, so deeper documents are rejected here instead of overflowing
/// the stack later.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected character {found:?} at byte {pos}")]
    Unexpected { found: char, pos: usize },

    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },

    #[error("invalid value {value:?} for attribute {attr:?} on <{tag}>")]
    InvalidAttribute { tag: String, attr: String, value: String },

    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),

    #[error("empty document")]
    Empty,

    #[error("unsupported root element <{0}>")]
    UnsupportedRoot(String),

    #[error("trailing content at byte {0}")]
    TrailingContent(usize),

    #[error("elements nested deeper than {limit} levels at byte {pos}")]
    TooDeep { limit: usize, pos: usize },
}

/// Parses a document into a node tree.
pub fn parse(data: &[u8]) -> Result<Node, ParseError> {
    let src = std::str::from_utf8(data)?;
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);

    let mut p = Parser::new(src);
    p.skip_misc()?;
    if p.at_end() {
        return Err(ParseError::Empty);
    }
    let root = p.element()?;
    p.skip_misc()?;
    if !p.at_end() {
        return Err(ParseError::TrailingContent(p.pos));
    }

    let name = root.name.clone();
    build(root)?.ok_or(ParseError::UnsupportedRoot(name))
}

/// An element as read from the source, before it is mapped onto a node.
#[derive(Debug)]
struct RawElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<RawElement>,
    text: String,
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    depth: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        let at = self.pos;
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(ParseError::Unexpected { found, pos: at }),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_past(&mut self, end: &str) -> Result<(), ParseError> {
        match self.rest().find(end) {
            Some(i) => {
                self.pos += i + end.len();
                Ok(())
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    /// Skips whitespace, comments, processing instructions and doctypes.
    fn skip_misc(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<!") {
                self.skip_past(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn name(&mut self) -> Result<&'s str, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')) {
            self.bump();
        }
        if self.pos == start {
            return match self.peek() {
                Some(found) => Err(ParseError::Unexpected { found, pos: start }),
                None => Err(ParseError::UnexpectedEof),
            };
        }
        Ok(&self.src[start..self.pos])
    }

    fn quoted(&mut self) -> Result<String, ParseError> {
        let at = self.pos;
        let quote = match self.bump() {
            Some(c @ ('"' | '\'')) => c,
            Some(found) => return Err(ParseError::Unexpected { found, pos: at }),
            None => return Err(ParseError::UnexpectedEof),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnexpectedEof),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    /// Decodes the escape following a backslash.
    fn escape(&mut self) -> Result<char, ParseError> {
        let at = self.pos - 1;
        let c = match self.bump().ok_or(ParseError::UnexpectedEof)? {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'v' => '\u{0b}',
            '0' => '\0',
            c @ ('\\' | '"' | '\'') => c,
            'x' => self.hex_escape(2, at)?,
            'u' => self.hex_escape(4, at)?,
            'U' => self.hex_escape(8, at)?,
            _ => return Err(ParseError::InvalidEscape(at)),
        };
        Ok(c)
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char, ParseError> {
        let rest = self.rest();
        let hex = rest.get(..digits).ok_or(ParseError::InvalidEscape(at))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidEscape(at))?;
        self.pos += digits;
        char::from_u32(code).ok_or(ParseError::InvalidEscape(at))
    }

    fn element(&mut self) -> Result<RawElement, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                pos: self.pos,
            });
        }
        self.depth += 1;
        let el = self.element_body();
        self.depth -= 1;
        el
    }

    fn element_body(&mut self) -> Result<RawElement, ParseError> {
        self.expect('<')?;
        let name = self.name()?.to_string();

        let mut attrs = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect('>')?;
                    return Ok(RawElement {
                        name,
                        attrs,
                        children: Vec::new(),
                        text: String::new(),
                    });
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let key = self.name()?.to_string();
                    self.skip_ws();
                    self.expect('=')?;
                    self.skip_ws();
                    let value = self.quoted()?;
                    attrs.push((key, value));
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }

        let mut children = Vec::new();
        let mut text = String::new();
        loop {
            let rest = self.rest();
            if rest.starts_with("</") {
                self.pos += 2;
                let found = self.name()?;
                if found != name {
                    return Err(ParseError::MismatchedTag {
                        expected: name,
                        found: found.to_string(),
                    });
                }
                self.skip_ws();
                self.expect('>')?;
                break;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with('<') {
                children.push(self.element()?);
            } else {
                match self.bump() {
                    Some(c) => text.push(c),
                    None => return Err(ParseError::UnexpectedEof),
                }
            }
        }

        Ok(RawElement {
            name,
            attrs,
            children,
            text,
        })
    }
}

fn num(tag: &str, attr: &str, value: &str) -> Result<f64, ParseError> {
    value.trim().parse().map_err(|_| invalid(tag, attr, value))
}

fn boolean(tag: &str, attr: &str, value: &str) -> Result<bool, ParseError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(tag, attr, value)),
    }
}

fn invalid(tag: &str, attr: &str, value: &str) -> ParseError {
    ParseError::InvalidAttribute {
        tag: tag.to_string(),
        attr: attr.to_string(),
        value: value.to_string(),
    }
}

/// Maps a raw element onto a node. Unknown elements map to `None`.
fn build(el: RawElement) -> Result<Option<Node>, ParseError> {
    let tag = el.name.as_str();
    let node: Node = match tag {
        "g" | "svg" => {
            let mut group = GroupNode::default();
            for (key, value) in &el.attrs {
                if key == "href" && !value.is_empty() {
                    group.href = Some(value.clone());
                }
            }
            for child in el.children {
                if let Some(node) = build(child)? {
                    group.children.push(node);
                }
            }
            group.into()
        }
        "rect" => {
            let mut rect = RectNode::default();
            for (key, value) in &el.attrs {
                match key.as_str() {
                    "x" => rect.x = num(tag, key, value)?,
                    "y" => rect.y = num(tag, key, value)?,
                    "width" => rect.width = num(tag, key, value)?,
                    "height" => rect.height = num(tag, key, value)?,
                    "transparency" => rect.transparency = num(tag, key, value)?,
                    "fill" => rect.fill = value.clone(),
                    "stroke" => rect.stroke = value.clone(),
                    _ => {}
                }
            }
            rect.into()
        }
        "circle" => {
            let mut circle = CircleNode::default();
            for (key, value) in &el.attrs {
                match key.as_str() {
                    "x" => circle.x = num(tag, key, value)?,
                    "y" => circle.y = num(tag, key, value)?,
                    "radius" => circle.radius = num(tag, key, value)?,
                    "fill" => circle.fill = value.clone(),
                    _ => {}
                }
            }
            circle.into()
        }
        "line" => {
            let mut line = LineNode::default();
            for (key, value) in &el.attrs {
                match key.as_str() {
                    "x1" => line.x1 = num(tag, key, value)?,
                    "y1" => line.y1 = num(tag, key, value)?,
                    "x2" => line.x2 = num(tag, key, value)?,
                    "y2" => line.y2 = num(tag, key, value)?,
                    "stroke" => line.stroke = value.clone(),
                    _ => {}
                }
            }
            line.into()
        }
        "text" => {
            let mut text = TextNode::default();
            let mut has_value = false;
            for (key, value) in &el.attrs {
                match key.as_str() {
                    "x" => text.x = num(tag, key, value)?,
                    "y" => text.y = num(tag, key, value)?,
                    "fill" => text.fill = value.clone(),
                    "value" => {
                        text.value = value.clone();
                        has_value = true;
                    }
                    _ => {}
                }
            }
            if !has_value {
                text.value = el.text.trim().to_string();
            }
            text.into()
        }
        "textInput" => {
            let mut input = TextInputNode::new(0.0, 0.0, 0.0);
            let mut focused = false;
            for (key, value) in &el.attrs {
                match key.as_str() {
                    "x" => input.x = num(tag, key, value)?,
                    "y" => input.y = num(tag, key, value)?,
                    "width" => input.width = num(tag, key, value)?,
                    "value" => input.set_value(value.clone()),
                    "textColor" => input.text_color = value.clone(),
                    "focused" => focused = boolean(tag, key, value)?,
                    _ => {}
                }
            }
            if focused {
                input.focus();
            }
            input.into()
        }
        _ => {
            log::debug!("skipping unknown element <{tag}>");
            return Ok(None);
        }
    };
    Ok(Some(node))
}
