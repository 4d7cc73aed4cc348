//! Collision detection and response
//!
//! Circles against circles, and circles against the static slabs of the
//! trough. Detection yields a `CollisionResult`; response separates the pair
//! along the normal and exchanges a restitution + Coulomb friction impulse.

use glam::Vec2;

use super::body::Body;
use super::boundary::StaticBody;
use crate::consts::{CORRECTION_PERCENT, PENETRATION_SLOP, RESTING_SPEED};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Unit contact normal. Circle pairs: from the first body toward the
    /// second. Circle vs slab: the slab's inward normal.
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let radii = a_radius + b_radius;
    let dist_sq = delta.length_squared();

    if dist_sq >= radii * radii {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Coincident centers: push apart vertically
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::Y };

    CollisionResult {
        hit: true,
        point: a_pos + normal * a_radius,
        normal,
        penetration: radii - dist,
    }
}

/// Check overlap between a circle and a trough slab. The slab acts as the
/// half-space behind its inward face, so however deep a body is pushed it
/// always leaves through that face.
pub fn circle_slab(center: Vec2, radius: f32, slab: &StaticBody) -> CollisionResult {
    let normal = slab.inward_normal();
    let dist = (center - slab.face_point()).dot(normal);
    if dist >= radius {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: center - normal * dist,
        normal,
        penetration: radius - dist,
    }
}

/// Restitution for an approach speed; slow contacts don't bounce
#[inline]
fn effective_restitution(approach_speed: f32, restitution: f32) -> f32 {
    if approach_speed < RESTING_SPEED {
        0.0
    } else {
        restitution
    }
}

/// Positional correction magnitude for a penetration
#[inline]
fn correction_depth(penetration: f32) -> f32 {
    (penetration - PENETRATION_SLOP).max(0.0) * CORRECTION_PERCENT
}

/// Resolve a contact between two dynamic bodies. `contact.normal` points from `a` to `b`.
pub fn resolve_pair(a: &mut Body, b: &mut Body, contact: &CollisionResult) {
    let n = contact.normal;
    let inv_sum = a.inv_mass() + b.inv_mass();
    if inv_sum <= 0.0 {
        return;
    }

    // Separate along the normal, split by inverse mass
    let correction = n * (correction_depth(contact.penetration) / inv_sum);
    a.pos -= correction * a.inv_mass();
    b.pos += correction * b.inv_mass();

    let ra = n * a.radius();
    let rb = -n * b.radius();
    let rel = b.velocity_at(rb) - a.velocity_at(ra);
    let vn = rel.dot(n);
    if vn >= 0.0 {
        return; // Separating
    }

    let e = effective_restitution(-vn, a.restitution().max(b.restitution()));
    let jn = -(1.0 + e) * vn / inv_sum;

    // Friction damps the tangential slip, clamped by the Coulomb cone
    let t = n.perp();
    let vt = rel.dot(t);
    let k_t = inv_sum
        + ra.perp_dot(t).powi(2) * a.inv_inertia()
        + rb.perp_dot(t).powi(2) * b.inv_inertia();
    let mu = a.friction().min(b.friction());
    let jt = (-vt / k_t).clamp(-mu * jn, mu * jn);

    let impulse = n * jn + t * jt;
    a.apply_impulse(-impulse, ra);
    b.apply_impulse(impulse, rb);
}

/// Resolve a contact between a dynamic body and an infinite-mass boundary.
/// `contact.normal` points from the boundary toward the body.
pub fn resolve_static(body: &mut Body, wall: &StaticBody, contact: &CollisionResult) {
    let n = contact.normal;
    body.pos += n * correction_depth(contact.penetration);

    let r = -n * body.radius();
    let v = body.velocity_at(r);
    let vn = v.dot(n);
    if vn >= 0.0 {
        return;
    }

    let e = effective_restitution(-vn, body.restitution().max(wall.restitution()));
    let jn = -(1.0 + e) * vn / body.inv_mass();

    let t = n.perp();
    let vt = v.dot(t);
    let k_t = body.inv_mass() + r.perp_dot(t).powi(2) * body.inv_inertia();
    let mu = body.friction().min(wall.friction());
    let jt = (-vt / k_t).clamp(-mu * jn, mu * jn);

    body.apply_impulse(n * jn + t * jt, r);
}

/// Push a body all the way out of a boundary and drop any velocity into it
pub fn settle_static(body: &mut Body, contact: &CollisionResult) {
    let n = contact.normal;
    body.pos += n * contact.penetration;
    let vn = body.vel.dot(n);
    if vn < 0.0 {
        body.vel -= n * vn;
    }
}
