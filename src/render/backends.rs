/// Headless backend that consumes display lists without rasterising.
pub mod null;
