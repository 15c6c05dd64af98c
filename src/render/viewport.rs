//! Viewport definition for rendering.
//!
//! A [`Viewport`] is the visible window area the browser chrome and page are
//! laid out in. The chrome sizes the URL bar from its width, and backends
//! size their surfaces from it.
//!
//! # Examples
//!
//! ```
//! use vgbrowse::render::Viewport;
//!
//! let mut vp = Viewport::new(0, 0, 800, 600);
//! vp.resize(1024, 768);
//! assert_eq!(vp.width, 1024);
//! assert!(vp.is_empty() == false);
//! ```

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Represents the viewport for rendering.
#[derive(Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal offset in pixels from the origin.
    pub x: i32,

    /// Vertical offset in pixels from the origin.
    pub y: i32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1024,
            height: 768,
        }
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Viewport {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Viewport {
    /// Creates a new [`Viewport`] with the given position and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Resizes the viewport to the given width and height.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The viewport as a rectangle in node coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(
            Point::new(self.x as f64, self.y as f64),
            (self.width as f64, self.height as f64),
        )
    }
}
