//! Input adapters
//!
//! Orientation samples steer gravity, pointer presses drop debris, resize
//! notices resize the drawing surface. Each is fed through an `EventSource`
//! so tests can drive them with synthetic events.

pub mod orientation;
pub mod pointer;
pub mod resize;
pub mod source;

pub use orientation::{ForceField, OrientationSample};
pub use pointer::{PointerButton, PointerPress, PointerSpawner};
pub use resize::{ManualViewport, ResizeCoordinator, ResizeNotice, Viewport, clamp_viewport};
pub use source::{EventQueue, EventSource};
