//! Scheduling primitives
//!
//! The host supplies time through a `Clock`. `Ticker` turns elapsed time into
//! whole fixed-period ticks (physics steps, spawn attempts); `FrameScheduler`
//! gates render frames and can be started and stopped explicitly.

use std::cell::Cell;

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand, for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Fixed-period accumulator
#[derive(Debug, Clone)]
pub struct Ticker {
    period_ms: f64,
    accumulator: f64,
    max_per_advance: u32,
    running: bool,
}

impl Ticker {
    /// A stopped ticker firing every `period_ms`, at most `max_per_advance`
    /// times per `advance` call
    pub fn new(period_ms: f64, max_per_advance: u32) -> Self {
        Self {
            period_ms,
            accumulator: 0.0,
            max_per_advance: max_per_advance.max(1),
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop and forget any partial period
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Feed elapsed time; returns how many ticks are due
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !self.running || !(elapsed_ms > 0.0) {
            return 0;
        }
        self.accumulator += elapsed_ms;

        let mut due = 0;
        while self.accumulator >= self.period_ms && due < self.max_per_advance {
            self.accumulator -= self.period_ms;
            due += 1;
        }
        due
    }
}

/// One render frame handed out by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// 0-based frame number since the scheduler was created
    pub index: u64,
    pub now_ms: f64,
    /// Time since the previous frame (0 for the first frame after a start)
    pub delta_ms: f64,
}

/// Start/stop gate for display-cadenced frames
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    running: bool,
    frames: u64,
    last_ms: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Claim the next frame at `now_ms`, or `None` while stopped
    pub fn next_frame(&mut self, now_ms: f64) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        let delta_ms = self.last_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_ms = Some(now_ms);

        let tick = FrameTick {
            index: self.frames,
            now_ms,
            delta_ms,
        };
        self.frames += 1;
        Some(tick)
    }
}
