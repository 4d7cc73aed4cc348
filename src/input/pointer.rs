//! Pointer presses to debris
//!
//! A primary press drops one body exactly where the pointer went down. These
//! insertions ignore the population ceiling.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{SimConfig, SizeBand};
use crate::sim::{BodyId, BodySpec, Glyph, World};

/// Mouse/touch button that went down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// From a DOM `MouseEvent.button` code
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// A pointer press at surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    pub x: f32,
    pub y: f32,
    pub button: PointerButton,
}

impl PointerPress {
    pub fn primary(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// A press reported in viewport (client) coordinates, translated onto a
    /// surface whose top-left corner sits at `surface_origin` in the viewport
    pub fn from_client(client: Vec2, surface_origin: Vec2, button: PointerButton) -> Self {
        let local = client - surface_origin;
        Self {
            x: local.x,
            y: local.y,
            button,
        }
    }
}

/// Inserts a body for every primary press
pub struct PointerSpawner {
    rng: Pcg32,
    size_band: SizeBand,
    restitution: f32,
    friction: f32,
}

impl PointerSpawner {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            size_band: config.size_band,
            restitution: config.pointer_restitution,
            friction: config.debris_friction,
        }
    }

    /// Handle a press. Non-primary buttons are ignored.
    pub fn press(&mut self, world: &mut World, press: PointerPress) -> Option<BodyId> {
        if press.button != PointerButton::Primary {
            return None;
        }
        let size = self.size_band.sample(&mut self.rng);
        let glyph = Glyph::random(&mut self.rng);
        let spec = BodySpec::new(Vec2::new(press.x, press.y), size, glyph)
            .with_restitution(self.restitution)
            .with_friction(self.friction);

        let id = world.add_body(spec);
        if let Some(id) = id {
            log::debug!("Pointer spawn {:?} at ({}, {})", id, press.x, press.y);
        }
        id
    }
}
