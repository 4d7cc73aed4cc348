//! Trash Rain - falling debris simulation core
//!
//! Core modules:
//! - `sim`: Rigid-body world, containment boundaries, collisions, periodic spawner
//! - `input`: Orientation, pointer and resize adapters fed by injectable event sources
//! - `renderer`: Painter/surface abstraction and the per-frame render loop
//! - `sched`: Clocks, fixed-rate tickers and the frame scheduler
//! - `session`: Owns one world and everything attached to it
//! - `config`: Tunables loaded from JSON
//! - `damage`: Cosmetic damage tier derived from the live body count

pub mod config;
pub mod damage;
pub mod input;
pub mod renderer;
pub mod sched;
pub mod session;
pub mod sim;

pub use config::{SimConfig, SizeBand};
pub use damage::DamageLevel;
pub use session::Session;
pub use sim::World;

/// Simulation constants
pub mod consts {
    /// Default physics tick rate (Hz)
    pub const PHYSICS_HZ: f32 = 60.0;
    /// Maximum physics ticks per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta fed to the tickers (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Acceleration (pixels/s²) produced by one unit of gravity
    pub const GRAVITY_SCALE: f32 = 1000.0;
    /// Velocity damping per second (applied to linear and angular velocity)
    pub const AIR_FRICTION: f32 = 0.6;
    /// Areal density used to derive body mass from radius
    pub const BODY_DENSITY: f32 = 0.001;

    /// Contact solver passes per physics tick
    pub const SOLVER_ITERATIONS: usize = 4;
    /// Penetration tolerated before positional correction kicks in (pixels)
    pub const PENETRATION_SLOP: f32 = 0.5;
    /// Fraction of the remaining penetration corrected per solver pass
    pub const CORRECTION_PERCENT: f32 = 0.8;
    /// Approach speeds below this (pixels/s) collide inelastically
    pub const RESTING_SPEED: f32 = 30.0;

    /// Boundary slab thickness (pixels)
    pub const BOUNDARY_THICKNESS: f32 = 100.0;
    /// Side walls are this many viewport heights tall
    pub const WALL_HEIGHT_FACTOR: f32 = 5.0;
    pub const BOUNDARY_RESTITUTION: f32 = 0.0;
    pub const BOUNDARY_FRICTION: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-4);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-0.5 - 2.0 * PI) - (-0.5)).abs() < 1e-4);
    }
}
