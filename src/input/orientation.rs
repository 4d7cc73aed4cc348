//! Device tilt to gravity
//!
//! Each orientation sample replaces the world's gravity outright; there is no
//! smoothing between samples.

use glam::Vec2;

use crate::config::SimConfig;
use crate::sim::World;

/// One orientation reading (degrees). Either angle may be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSample {
    /// Left-right tilt
    pub gamma: Option<f32>,
    /// Front-back tilt
    pub beta: Option<f32>,
}

impl OrientationSample {
    pub fn new(gamma: f32, beta: f32) -> Self {
        Self {
            gamma: Some(gamma),
            beta: Some(beta),
        }
    }
}

/// Maps tilt samples onto the gravity vector
#[derive(Debug, Clone, Copy)]
pub struct ForceField {
    /// Tilt (degrees) that maps to a full unit of gravity
    pub sensitivity: f32,
    /// Downward pull added on top of the front-back tilt
    pub baseline: f32,
}

impl Default for ForceField {
    fn default() -> Self {
        Self {
            sensitivity: 45.0,
            baseline: 0.5,
        }
    }
}

impl ForceField {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            sensitivity: config.tilt_sensitivity,
            baseline: config.gravity_baseline,
        }
    }

    /// Gravity for a sample, or `None` if the sample is incomplete
    pub fn gravity_for(&self, sample: OrientationSample) -> Option<Vec2> {
        let gamma = sample.gamma.filter(|g| g.is_finite())?;
        let beta = sample.beta.filter(|b| b.is_finite())?;

        let x = (gamma / self.sensitivity).clamp(-1.0, 1.0);
        let y = (beta / self.sensitivity).clamp(-1.0, 1.0);
        Some(Vec2::new(x, y.abs() + self.baseline))
    }

    /// Apply a sample to the world. Returns whether gravity changed.
    pub fn apply(&self, world: &mut World, sample: OrientationSample) -> bool {
        match self.gravity_for(sample) {
            Some(gravity) => {
                world.set_gravity(gravity);
                true
            }
            None => {
                log::trace!("Orientation sample incomplete, gravity unchanged");
                false
            }
        }
    }
}
