use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to the font metrics in use by a renderer.
pub type FontHandle = Arc<FontMetrics>;

/// Metrics of the (monospace) font face used for all text.
///
/// Every glyph advances by `char_width`, so text can be measured without
/// shaping. Text input caret and selection geometry rely on the same
/// advance, which keeps them aligned with the drawn value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Family name handed to the drawing backend.
    pub family: String,
    /// Font size in pixels. Also used as the line height.
    pub size: f64,
    /// Horizontal advance of a single character in pixels.
    pub char_width: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 13.0,
            char_width: 7.0,
        }
    }
}

impl FontMetrics {
    pub fn new(family: impl Into<String>, size: f64, char_width: f64) -> Self {
        Self {
            family: family.into(),
            size,
            char_width,
        }
    }

    /// Width of `chars` characters.
    #[inline]
    pub fn advance(&self, chars: usize) -> f64 {
        chars as f64 * self.char_width
    }

    /// Bounds of `text` drawn with its baseline starting at `origin`.
    pub fn measure(&self, text: &str, origin: Point) -> Rect {
        let width = self.advance(text.chars().count());
        Rect::new(origin.x, origin.y - self.size, origin.x + width, origin.y)
    }

    pub fn into_handle(self) -> FontHandle {
        Arc::new(self)
    }
}
