//! Periodic debris spawner
//!
//! Emits one body per attempt at a random x just above the visible area, as
//! long as the population is below the ceiling. After every attempt the live
//! count goes to the registered observer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{BodyId, BodySpec, Glyph};
use super::world::World;
use crate::config::{SimConfig, SizeBand};

/// Receives the live dynamic body count
pub type CountObserver = Box<dyn FnMut(usize)>;

/// What a single spawn attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(BodyId),
    /// Population already at the ceiling
    AtCeiling,
    /// The world refused the body
    Refused,
}

/// Periodic emitter with a population ceiling
pub struct Spawner {
    rng: Pcg32,
    max_bodies: usize,
    /// Viewport width captured at construction, same as the boundaries
    width: f32,
    spawn_height: f32,
    size_band: SizeBand,
    restitution: f32,
    friction: f32,
    initial_bodies: usize,
    initial_spread: f32,
    observer: Option<CountObserver>,
    attempts: u64,
}

impl Spawner {
    pub fn new(config: &SimConfig, width: f32, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            max_bodies: config.max_bodies,
            width: width.max(1.0),
            spawn_height: config.spawn_height,
            size_band: config.size_band,
            restitution: config.debris_restitution,
            friction: config.debris_friction,
            initial_bodies: config.initial_bodies,
            initial_spread: config.initial_spread,
            observer: None,
            attempts: 0,
        }
    }

    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    /// Spawn attempts made so far (successful or not)
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn set_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Pre-seed the startup batch at staggered heights above the screen.
    /// Returns how many bodies were added.
    pub fn seed_initial(&mut self, world: &mut World) -> usize {
        let room = self.max_bodies.saturating_sub(world.dynamic_count());
        let batch = self.initial_bodies.min(room);
        let mut added = 0;
        for _ in 0..batch {
            let y = if self.initial_spread > 0.0 {
                -self.rng.random_range(0.0..self.initial_spread)
            } else {
                0.0
            };
            let spec = self.debris_spec(y);
            if world.add_body(spec).is_some() {
                added += 1;
            }
        }
        log::debug!("Seeded {added} bodies");
        added
    }

    /// One spawn attempt, then report the count
    pub fn attempt(&mut self, world: &mut World) -> SpawnOutcome {
        self.attempts += 1;

        let outcome = if world.dynamic_count() < self.max_bodies {
            let spec = self.debris_spec(self.spawn_height);
            match world.add_body(spec) {
                Some(id) => SpawnOutcome::Spawned(id),
                None => SpawnOutcome::Refused,
            }
        } else {
            log::trace!("Spawn skipped at ceiling {}", self.max_bodies);
            SpawnOutcome::AtCeiling
        };

        let count = world.dynamic_count();
        if let Some(observer) = self.observer.as_mut() {
            observer(count);
        }
        outcome
    }

    fn debris_spec(&mut self, y: f32) -> BodySpec {
        let x = self.rng.random_range(0.0..self.width);
        let size = self.size_band.sample(&mut self.rng);
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let glyph = Glyph::random(&mut self.rng);

        BodySpec::new(Vec2::new(x, y), size, glyph)
            .with_angle(angle)
            .with_restitution(self.restitution)
            .with_friction(self.friction)
    }
}
