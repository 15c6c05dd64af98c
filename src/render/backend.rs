use crate::render::{Color, FontMetrics, RenderList, Viewport};
use kurbo::{Point, Rect};
use std::any::Any;

/// The drawing capability the scene graph paints through.
///
/// Nodes only ever issue these primitive calls; what they turn into (a
/// display list, pixels, a test recording) is up to the implementor.
pub trait DrawTarget {
    /// Metrics of the font face text is drawn with.
    fn fonts(&self) -> &FontMetrics;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);

    /// Draws `text` with its baseline starting at `origin` and returns the
    /// bounds it covers.
    fn fill_text(&mut self, text: &str, origin: Point, color: Color) -> Rect;
}

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl From<Viewport> for SurfaceSize {
    fn from(vp: Viewport) -> Self {
        Self {
            width: vp.width,
            height: vp.height,
        }
    }
}

/// Type-erased surface so a host can hold it without generics.
pub trait ErasedSurface: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn size(&self) -> SurfaceSize;
}

/// Core backend interface. Calls occur on the backend's owning thread.
pub trait RenderBackend {
    /// Human readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Create a new surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> anyhow::Result<Box<dyn ErasedSurface + Send>>;

    /// Paint a frame's display list onto the given surface.
    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> anyhow::Result<()>;
}
