//! Per-frame render loop
//!
//! Paints whatever world state is current when the frame fires. No
//! interpolation between physics ticks, so frames may show the same state
//! twice or skip one when the rates drift.

use super::Canvas;
use crate::sched::FrameScheduler;
use crate::sim::{BodyView, World};

/// Paint every dynamic body. Returns how many were painted.
pub fn paint_world<C: Canvas + ?Sized>(world: &World, canvas: &mut C) -> usize {
    let size = canvas.size();
    canvas.clear(size);

    let mut painted = 0;
    for view in world.all_bodies() {
        // Walls and floor are invisible
        let BodyView::Dynamic(body) = view else {
            continue;
        };
        canvas.save();
        canvas.translate(body.pos.x, body.pos.y);
        canvas.rotate(body.angle);
        canvas.fill_glyph(body.glyph().as_str(), body.display_size());
        canvas.restore();
        painted += 1;
    }
    painted
}

/// Frame counters and a rolling FPS estimate
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
    last_painted: usize,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            last_painted: 0,
        }
    }
}

impl FrameStats {
    pub fn record(&mut self, time_ms: f64, painted: usize) {
        self.last_painted = painted;
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest entry is the one we'll overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time_ms - oldest_time;
            if elapsed > 0.0 {
                self.fps = (60000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Bodies painted in the most recent frame
    pub fn last_painted(&self) -> usize {
        self.last_painted
    }
}

/// Display-cadenced painter of the world
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    scheduler: FrameScheduler,
    stats: FrameStats,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Paint one frame if running. Returns `false` once stopped, which tells
    /// the host not to schedule another frame.
    pub fn frame<C: Canvas + ?Sized>(
        &mut self,
        now_ms: f64,
        world: &World,
        canvas: &mut C,
    ) -> bool {
        let Some(tick) = self.scheduler.next_frame(now_ms) else {
            return false;
        };
        let painted = paint_world(world, canvas);
        self.stats.record(tick.now_ms, painted);
        true
    }
}
