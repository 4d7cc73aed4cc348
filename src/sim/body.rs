//! Dynamic simulation bodies
//!
//! Every dynamic body is a circle. Its glyph and display size are fixed at
//! creation; everything else is mutated in place by the integrator.

use glam::Vec2;
use rand::Rng;

use crate::consts::BODY_DENSITY;

/// Debris glyph palette
pub const GLYPHS: [&str; 17] = [
    "🗑️", "🚮", "🚬", "🥤", "🍌", "💩", "🦠", "⚠️", "📵",
    "☢️", "🦴", "🐟", "🥡", "🚽", "🧾", "🗞️", "📦",
];

/// Unique body identifier (shared by dynamic and static bodies)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Visual tag painted for a body. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph(&'static str);

impl Glyph {
    pub fn new(tag: &'static str) -> Option<Self> {
        (!tag.is_empty()).then_some(Self(tag))
    }

    /// Uniform pick from the debris palette
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(GLYPHS[rng.random_range(0..GLYPHS.len())])
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Parameters for inserting a dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    pub glyph: &'static str,
    pub display_size: f32,
}

impl BodySpec {
    /// A resting body whose radius is half its display size
    pub fn new(pos: Vec2, display_size: f32, glyph: Glyph) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            radius: display_size / 2.0,
            restitution: 0.5,
            friction: 0.5,
            glyph: glyph.as_str(),
            display_size,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Why this spec cannot become a body, if it can't
    pub fn defect(&self) -> Option<&'static str> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            Some("radius must be positive")
        } else if !(self.pos.is_finite() && self.vel.is_finite()) {
            Some("position and velocity must be finite")
        } else if !(self.angle.is_finite() && self.angular_vel.is_finite()) {
            Some("angle and angular velocity must be finite")
        } else if self.glyph.is_empty() {
            Some("glyph must not be empty")
        } else if !(self.display_size.is_finite() && self.display_size > 0.0) {
            Some("display size must be positive")
        } else {
            None
        }
    }
}

/// A dynamic circular body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    radius: f32,
    restitution: f32,
    friction: f32,
    glyph: Glyph,
    display_size: f32,
    inv_mass: f32,
    inv_inertia: f32,
}

impl Body {
    /// Build a body from a spec, or `None` if the spec is malformed
    pub(crate) fn from_spec(id: BodyId, spec: &BodySpec) -> Option<Self> {
        if spec.defect().is_some() {
            return None;
        }
        let glyph = Glyph::new(spec.glyph)?;
        // Uniform disc
        let mass = std::f32::consts::PI * spec.radius * spec.radius * BODY_DENSITY;
        let inertia = 0.5 * mass * spec.radius * spec.radius;

        Some(Self {
            id,
            pos: spec.pos,
            vel: spec.vel,
            angle: spec.angle,
            angular_vel: spec.angular_vel,
            radius: spec.radius,
            restitution: spec.restitution.max(0.0),
            friction: spec.friction.max(0.0),
            glyph,
            display_size: spec.display_size,
            inv_mass: 1.0 / mass,
            inv_inertia: 1.0 / inertia,
        })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    #[inline]
    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    #[inline]
    pub fn display_size(&self) -> f32 {
        self.display_size
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    #[inline]
    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Semi-implicit Euler: velocity first, then position
    pub fn integrate(&mut self, accel: Vec2, damping: f32, dt: f32) {
        self.vel = (self.vel + accel * dt) * damping;
        self.angular_vel *= damping;
        self.pos += self.vel * dt;
        self.angle = crate::normalize_angle(self.angle + self.angular_vel * dt);
    }

    /// Apply an impulse at offset `r` from the center
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.vel += impulse * self.inv_mass;
        self.angular_vel += r.perp_dot(impulse) * self.inv_inertia;
    }

    /// Velocity of the material point at offset `r` from the center
    #[inline]
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.vel + r.perp() * self.angular_vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spec() -> BodySpec {
        BodySpec::new(Vec2::new(10.0, 20.0), 40.0, Glyph::new("📦").unwrap())
    }

    #[test]
    fn test_spec_radius_is_half_display_size() {
        let s = spec();
        assert_eq!(s.radius, 20.0);
        assert_eq!(s.display_size, 40.0);
        assert!(s.defect().is_none());
    }

    #[test]
    fn test_malformed_specs_are_refused() {
        let zero = BodySpec { radius: 0.0, ..spec() };
        let negative = BodySpec { radius: -4.0, ..spec() };
        let nan_pos = BodySpec {
            pos: Vec2::new(f32::NAN, 0.0),
            ..spec()
        };
        let no_glyph = BodySpec { glyph: "", ..spec() };

        for bad in [zero, negative, nan_pos, no_glyph] {
            assert!(bad.defect().is_some());
            assert!(Body::from_spec(BodyId(1), &bad).is_none());
        }
    }

    #[test]
    fn test_empty_glyph_rejected() {
        assert!(Glyph::new("").is_none());
        assert_eq!(Glyph::new("🍌").map(|g| g.as_str()), Some("🍌"));
    }

    #[test]
    fn test_random_glyph_from_palette() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let g = Glyph::random(&mut rng);
            assert!(GLYPHS.contains(&g.as_str()));
        }
    }

    #[test]
    fn test_integrate_velocity_before_position() {
        let mut body = Body::from_spec(BodyId(1), &spec()).unwrap();
        body.integrate(Vec2::new(0.0, 100.0), 1.0, 0.5);
        // v = 50 after the velocity update, so the position moves by 25
        assert!((body.vel.y - 50.0).abs() < 1e-4);
        assert!((body.pos.y - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_offset_impulse_spins() {
        let mut body = Body::from_spec(BodyId(1), &spec()).unwrap();
        body.apply_impulse(Vec2::new(1.0, 0.0), Vec2::new(0.0, 20.0));
        assert!(body.vel.x > 0.0);
        assert!(body.angular_vel < 0.0);
    }
}
