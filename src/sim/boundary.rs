//! Containment trough
//!
//! Three immovable slabs hug the viewport captured at construction: a floor
//! just below the bottom edge and two tall walls just outside the sides. They
//! are never rebuilt, so after a viewport resize they keep the old geometry.

use glam::Vec2;

use super::body::BodyId;
use crate::consts::{
    BOUNDARY_FRICTION, BOUNDARY_RESTITUTION, BOUNDARY_THICKNESS, WALL_HEIGHT_FACTOR,
};

/// Which part of the trough a static body is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    Floor,
    LeftWall,
    RightWall,
}

/// An immovable axis-aligned box. Carries no velocity: it is always zero.
#[derive(Debug, Clone)]
pub struct StaticBody {
    pub id: BodyId,
    pub side: BoundarySide,
    center: Vec2,
    half_extents: Vec2,
    restitution: f32,
    friction: f32,
}

impl StaticBody {
    pub fn new(id: BodyId, side: BoundarySide, center: Vec2, size: Vec2) -> Self {
        Self {
            id,
            side,
            center,
            half_extents: size / 2.0,
            restitution: BOUNDARY_RESTITUTION,
            friction: BOUNDARY_FRICTION,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Y of the top face (screen coordinates, y grows downward)
    pub fn top(&self) -> f32 {
        self.min().y
    }

    /// Unit normal of the face that looks into the trough
    pub fn inward_normal(&self) -> Vec2 {
        match self.side {
            BoundarySide::Floor => Vec2::NEG_Y,
            BoundarySide::LeftWall => Vec2::X,
            BoundarySide::RightWall => Vec2::NEG_X,
        }
    }

    /// Center of the inward face
    pub fn face_point(&self) -> Vec2 {
        self.center + self.inward_normal() * self.half_extents
    }
}

/// Build floor, left wall and right wall for a `width` x `height` viewport.
/// Ids are taken from `next_id`.
pub fn build_trough(
    width: f32,
    height: f32,
    mut next_id: impl FnMut() -> BodyId,
) -> [StaticBody; 3] {
    let t = BOUNDARY_THICKNESS;
    let wall_height = height * WALL_HEIGHT_FACTOR;

    [
        StaticBody::new(
            next_id(),
            BoundarySide::Floor,
            Vec2::new(width / 2.0, height + t / 2.0),
            Vec2::new(width, t),
        ),
        StaticBody::new(
            next_id(),
            BoundarySide::LeftWall,
            Vec2::new(-t / 2.0, height / 2.0),
            Vec2::new(t, wall_height),
        ),
        StaticBody::new(
            next_id(),
            BoundarySide::RightWall,
            Vec2::new(width + t / 2.0, height / 2.0),
            Vec2::new(t, wall_height),
        ),
    ]
}
