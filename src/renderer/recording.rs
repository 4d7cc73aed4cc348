//! In-memory canvas
//!
//! Records paint calls for assertions, or just counts glyphs when recording
//! is off (headless runs).

use super::{Painter, Surface, SurfaceSize};

/// A recorded paint call
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Clear(SurfaceSize),
    Save,
    Translate(f32, f32),
    Rotate(f32),
    Glyph { glyph: String, size: f32 },
    Restore,
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: SurfaceSize,
    ops: Vec<PaintOp>,
    recording: bool,
    glyphs_painted: u64,
    depth: usize,
}

impl RecordingCanvas {
    /// Canvas that records every call
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
            recording: true,
            glyphs_painted: 0,
            depth: 0,
        }
    }

    /// Canvas that only counts glyphs
    pub fn headless(size: SurfaceSize) -> Self {
        Self {
            recording: false,
            ..Self::new(size)
        }
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn glyphs_painted(&self) -> u64 {
        self.glyphs_painted
    }

    /// Unbalanced `save` calls outstanding
    pub fn save_depth(&self) -> usize {
        self.depth
    }

    fn record(&mut self, op: PaintOp) {
        if self.recording {
            self.ops.push(op);
        }
    }
}

impl Surface for RecordingCanvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}

impl Painter for RecordingCanvas {
    fn clear(&mut self, size: SurfaceSize) {
        self.record(PaintOp::Clear(size));
    }

    fn save(&mut self) {
        self.depth += 1;
        self.record(PaintOp::Save);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.record(PaintOp::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.record(PaintOp::Rotate(angle));
    }

    fn fill_glyph(&mut self, glyph: &str, size_px: f32) {
        self.glyphs_painted += 1;
        self.record(PaintOp::Glyph {
            glyph: glyph.to_string(),
            size: size_px,
        });
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.record(PaintOp::Restore);
    }
}
