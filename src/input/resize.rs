//! Viewport resize handling
//!
//! A resize notice carries no payload: the coordinator re-queries the
//! viewport and copies its size onto the drawing surface. The world and its
//! boundaries are left alone.

use std::cell::Cell;
use std::rc::Rc;

use crate::renderer::{Surface, SurfaceSize};

/// "The viewport changed" notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeNotice;

/// Source of the current viewport dimensions (may report nonsense)
pub trait Viewport {
    fn viewport_size(&self) -> (i32, i32);
}

/// Viewport whose size is set by hand. Clones share the size.
#[derive(Debug, Clone)]
pub struct ManualViewport {
    size: Rc<Cell<(i32, i32)>>,
}

impl ManualViewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Rc::new(Cell::new((width, height))),
        }
    }

    pub fn set(&self, width: i32, height: i32) {
        self.size.set((width, height));
    }
}

impl Viewport for ManualViewport {
    fn viewport_size(&self) -> (i32, i32) {
        self.size.get()
    }
}

/// Clamp a reported viewport size to at least 1x1
pub fn clamp_viewport(width: i32, height: i32) -> SurfaceSize {
    let size = SurfaceSize::new(width.max(1) as u32, height.max(1) as u32);
    if width < 1 || height < 1 {
        log::debug!("Viewport {width}x{height} clamped to {}x{}", size.width, size.height);
    }
    size
}

/// Keeps the drawing surface sized to the viewport
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeCoordinator;

impl ResizeCoordinator {
    /// Re-query the viewport and resize the surface. Returns the new size.
    pub fn handle<S: Surface + ?Sized>(
        &self,
        viewport: &dyn Viewport,
        surface: &mut S,
    ) -> SurfaceSize {
        let (width, height) = viewport.viewport_size();
        let size = clamp_viewport(width, height);
        if surface.size() != size {
            surface.set_size(size);
            log::debug!("Surface resized to {}x{}", size.width, size.height);
        }
        size
    }
}
