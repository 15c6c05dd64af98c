//! Render list and display items.
//!
//! This module defines a lightweight, immediate-style render list
//! consisting of [`DisplayItem`] commands. The scene graph draws into a
//! [`RenderList`] through the [`DrawTarget`] trait every frame, and a
//! [`RenderBackend`](crate::render::backend::RenderBackend) later consumes
//! the list to put pixels on a surface.
//!
//! # Example
//!
//! ```rust
//! use vgbrowse::render::{Color, DisplayItem, FontMetrics, RenderList};
//! use vgbrowse::render::backend::DrawTarget;
//! use kurbo::Rect;
//!
//! let mut list = RenderList::new(FontMetrics::default().into_handle());
//!
//! // Clear background
//! list.add_command(DisplayItem::Clear { color: Color::WHITE });
//!
//! // Draw a red rectangle
//! list.fill_rect(Rect::new(10.0, 20.0, 110.0, 70.0), Color::RED);
//! assert_eq!(list.items.len(), 2);
//! ```

use crate::render::backend::DrawTarget;
use crate::render::{Color, FontHandle, FontMetrics};
use kurbo::{Point, Rect};

/// A single display item representing a drawing command.
///
/// These commands are appended to a [`RenderList`] and later processed
/// by the render backend.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    /// Clear the entire surface with the given color.
    Clear {
        /// The color to clear the surface with.
        color: Color,
    },

    /// Draw a filled rectangle at `(x, y)` with width `w` and height `h`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        /// The color to fill the rectangle with.
        color: Color,
    },

    /// Draw the outline of a rectangle.
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        /// Line width in pixels.
        width: f32,
    },

    /// Draw a filled circle.
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },

    /// Draw a straight line segment.
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },

    /// Draw a text run with its baseline starting at `(x, y)`.
    TextRun {
        x: f32,
        y: f32,
        /// The text to render.
        text: String,
        /// The font size to use for the text.
        size: f32,
        /// The color to render the text with.
        color: Color,
    },
}

/// A list of display items to be rendered.
///
/// Collects commands while the scene graph paints, to be consumed by the
/// rendering backend.
#[derive(Clone, Debug)]
pub struct RenderList {
    /// Sequence of drawing commands to execute.
    pub items: Vec<DisplayItem>,
    fonts: FontHandle,
}

impl Default for RenderList {
    fn default() -> Self {
        Self::new(FontMetrics::default().into_handle())
    }
}

impl RenderList {
    /// Creates a new, empty render list measuring text with `fonts`.
    pub fn new(fonts: FontHandle) -> Self {
        RenderList {
            items: Vec::new(),
            fonts,
        }
    }

    /// Adds a new display item (drawing command) to the list.
    pub fn add_command(&mut self, command: DisplayItem) {
        self.items.push(command);
    }

    /// Clears all display items from the list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the texts of all text runs, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                DisplayItem::TextRun { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawTarget for RenderList {
    fn fonts(&self) -> &FontMetrics {
        &self.fonts
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.add_command(DisplayItem::Rect {
            x: rect.x0 as f32,
            y: rect.y0 as f32,
            w: rect.width() as f32,
            h: rect.height() as f32,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.add_command(DisplayItem::StrokeRect {
            x: rect.x0 as f32,
            y: rect.y0 as f32,
            w: rect.width() as f32,
            h: rect.height() as f32,
            color,
            width: width as f32,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.add_command(DisplayItem::Circle {
            cx: center.x as f32,
            cy: center.y as f32,
            radius: radius as f32,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.add_command(DisplayItem::Line {
            x1: from.x as f32,
            y1: from.y as f32,
            x2: to.x as f32,
            y2: to.y as f32,
            color,
            width: width as f32,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, color: Color) -> Rect {
        let bounds = self.fonts.measure(text, origin);
        self.add_command(DisplayItem::TextRun {
            x: origin.x as f32,
            y: origin.y as f32,
            text: text.to_string(),
            size: self.fonts.size as f32,
            color,
        });
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut list = RenderList::default();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 5.0), Color::RED);
        list.fill_circle(Point::new(3.0, 4.0), 2.0, Color::BLACK);
        let bounds = list.fill_text("hi", Point::new(1.0, 20.0), Color::BLACK);

        assert_eq!(list.items.len(), 3);
        assert!(matches!(list.items[0], DisplayItem::Rect { w, h, .. } if w == 10.0 && h == 5.0));
        assert!(matches!(list.items[1], DisplayItem::Circle { radius, .. } if radius == 2.0));
        assert_eq!(list.texts(), vec!["hi"]);
        assert_eq!(bounds, Rect::new(1.0, 7.0, 15.0, 20.0));

        list.clear();
        assert!(list.items.is_empty());
    }
}
