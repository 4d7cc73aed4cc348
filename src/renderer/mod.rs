//! Rendering module
//!
//! Bodies are painted as glyphs through a 2D-canvas-shaped `Painter`. The web
//! host forwards to `CanvasRenderingContext2d`; tests and the headless host
//! use `RecordingCanvas`.

pub mod frame;
pub mod recording;

pub use frame::{FrameStats, RenderLoop, paint_world};
pub use recording::{PaintOp, RecordingCanvas};

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Drawing surface whose pixel size the core can query and set
pub trait Surface {
    fn size(&self) -> SurfaceSize;
    fn set_size(&mut self, size: SurfaceSize);
}

/// Immediate-mode 2D painting with a transform stack
pub trait Painter {
    /// Clear the whole surface
    fn clear(&mut self, size: SurfaceSize);
    /// Push the current transform
    fn save(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    /// Paint a glyph centered on the origin, `size_px` tall
    fn fill_glyph(&mut self, glyph: &str, size_px: f32);
    /// Pop back to the last saved transform
    fn restore(&mut self);
}

/// A surface that can also be painted on
pub trait Canvas: Painter + Surface {}

impl<T: Painter + Surface> Canvas for T {}
