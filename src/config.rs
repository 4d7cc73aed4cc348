//! Simulation configuration
//!
//! Read once at startup from JSON (a DOM element on the web, an environment
//! variable natively). Nothing is written back.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY_SCALE, MAX_SUBSTEPS, PHYSICS_HZ};

/// Range of display sizes (pixels) a new body is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBand {
    pub min: f32,
    pub max: f32,
}

impl Default for SizeBand {
    fn default() -> Self {
        Self {
            min: 30.0,
            max: 50.0,
        }
    }
}

impl SizeBand {
    /// Uniform sample in `[min, max)`; a degenerate band always yields `min`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max >= self.min
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Population ===
    /// Ceiling enforced by the periodic spawner
    pub max_bodies: usize,
    /// Bodies pre-seeded above the screen at startup
    pub initial_bodies: usize,
    /// Pre-seeded bodies start up to this far above the top edge (pixels)
    pub initial_spread: f32,

    // === Spawning ===
    /// Period between spawn attempts (ms)
    pub spawn_period_ms: f64,
    /// Vertical spawn position, negative is above the visible area
    pub spawn_height: f32,
    /// Display size band shared by periodic and pointer spawns
    pub size_band: SizeBand,
    pub debris_restitution: f32,
    pub debris_friction: f32,
    /// Pointer-spawned bodies bounce a little more
    pub pointer_restitution: f32,

    // === Physics ===
    pub physics_hz: f32,
    pub max_substeps: u32,
    /// Gravity before the first orientation sample arrives
    pub initial_gravity: Vec2,
    /// Pixels/s² per unit of gravity
    pub gravity_scale: f32,

    // === Orientation ===
    /// Tilt (degrees) that maps to full gravity on an axis
    pub tilt_sensitivity: f32,
    /// Minimum downward pull, even when the device is level
    pub gravity_baseline: f32,

    // === Session ===
    /// Fixed RNG seed; the host picks one from the clock when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_bodies: 500,
            initial_bodies: 20,
            initial_spread: 500.0,

            spawn_period_ms: 100.0,
            spawn_height: -60.0,
            size_band: SizeBand::default(),
            debris_restitution: 0.5,
            debris_friction: 0.5,
            pointer_restitution: 0.6,

            physics_hz: PHYSICS_HZ,
            max_substeps: MAX_SUBSTEPS,
            initial_gravity: Vec2::new(0.0, 1.0),
            gravity_scale: GRAVITY_SCALE,

            tilt_sensitivity: 45.0,
            gravity_baseline: 0.5,

            seed: None,
        }
    }
}

impl SimConfig {
    /// DOM element whose text holds the JSON config (web)
    pub const ELEMENT_ID: &'static str = "trash-rain-config";
    /// Environment variable holding the JSON config (native)
    pub const ENV_VAR: &'static str = "TRASH_RAIN_CONFIG";

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the effective config, for startup diagnostics
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Repair out-of-range values, logging each repair
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.size_band.is_valid() {
            if self.size_band.min.is_finite()
                && self.size_band.max.is_finite()
                && self.size_band.min > 0.0
                && self.size_band.max > 0.0
            {
                log::warn!("Size band inverted, swapping {:?}", self.size_band);
                std::mem::swap(&mut self.size_band.min, &mut self.size_band.max);
            } else {
                log::warn!("Invalid size band {:?}, using default", self.size_band);
                self.size_band = defaults.size_band;
            }
        }
        if !(self.spawn_period_ms.is_finite() && self.spawn_period_ms > 0.0) {
            log::warn!("Invalid spawn period {}, using default", self.spawn_period_ms);
            self.spawn_period_ms = defaults.spawn_period_ms;
        }
        if !(self.physics_hz.is_finite() && self.physics_hz > 0.0) {
            log::warn!("Invalid physics rate {}, using default", self.physics_hz);
            self.physics_hz = defaults.physics_hz;
        }
        if self.max_substeps == 0 {
            log::warn!("max_substeps must be at least 1");
            self.max_substeps = 1;
        }
        if !(self.tilt_sensitivity.is_finite() && self.tilt_sensitivity > 0.0) {
            log::warn!("Invalid tilt sensitivity {}, using default", self.tilt_sensitivity);
            self.tilt_sensitivity = defaults.tilt_sensitivity;
        }
        if !(self.initial_spread.is_finite() && self.initial_spread >= 0.0) {
            log::warn!("Invalid initial spread {}, using default", self.initial_spread);
            self.initial_spread = defaults.initial_spread;
        }
        if !self.initial_gravity.is_finite() {
            self.initial_gravity = defaults.initial_gravity;
        }
        if !self.gravity_scale.is_finite() {
            self.gravity_scale = defaults.gravity_scale;
        }
        self
    }

    /// Fixed physics tick duration (seconds)
    pub fn physics_dt(&self) -> f32 {
        1.0 / self.physics_hz
    }

    /// Fixed physics tick duration (ms)
    pub fn physics_period_ms(&self) -> f64 {
        1000.0 / self.physics_hz as f64
    }

    fn parse_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded simulation config");
                config.sanitized()
            }
            Err(e) => {
                log::error!("Bad simulation config ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Load config from the page's JSON element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => Self::parse_or_default(&json),
            _ => {
                log::info!("Using default simulation config");
                Self::default()
            }
        }
    }

    /// Load config from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(json) if !json.trim().is_empty() => Self::parse_or_default(&json),
            _ => {
                log::info!("Using default simulation config");
                Self::default()
            }
        }
    }
}
