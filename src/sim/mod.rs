//! Simulation module
//!
//! Bodies, the containment trough, collision response, the world integrator
//! and the periodic spawner. No rendering or platform dependencies.

pub mod body;
pub mod boundary;
pub mod collision;
pub mod spawn;
pub mod world;

pub use body::{Body, BodyId, BodySpec, GLYPHS, Glyph};
pub use boundary::{BoundarySide, StaticBody};
pub use collision::{CollisionResult, circle_circle, circle_slab};
pub use spawn::{CountObserver, SpawnOutcome, Spawner};
pub use world::{BodyView, World};
