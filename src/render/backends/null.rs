use crate::render::backend::{ErasedSurface, RenderBackend, SurfaceSize};
use crate::render::RenderList;
use anyhow::{anyhow, Result};
use std::any::Any;

/// Null backend renderer that does not perform any rendering.
///
/// It accepts display lists and keeps counters, which is enough for
/// headless runs and tests.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    /// Creates a new instance of the null backend.
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

impl RenderBackend for NullBackend {
    fn name(&self) -> &str {
        "NullBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>> {
        Ok(Box::new(NullSurface::new(size)?))
    }

    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        s.frame_id = s.frame_id.wrapping_add(1);
        s.last_item_count = list.items.len();
        Ok(())
    }
}

#[derive(Debug)]
pub struct NullSurface {
    /// Size of the surface in pixels.
    pub size: SurfaceSize,
    /// Frame ID for the surface, used to track rendering frames.
    frame_id: u64,
    /// Number of display items in the last rendered frame.
    last_item_count: usize,
}

impl NullSurface {
    pub fn new(size: SurfaceSize) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("surface size must be non-zero, got {}x{}", size.width, size.height));
        }
        Ok(Self {
            size,
            frame_id: 0,
            last_item_count: 0,
        })
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn last_item_count(&self) -> usize {
        self.last_item_count
    }
}

impl ErasedSurface for NullSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }
}
