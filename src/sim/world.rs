//! Body store and integrator
//!
//! The world owns every body and the gravity vector. It never schedules
//! itself: a fixed-rate scheduler calls `step` once per physics tick.

use glam::Vec2;

use super::body::{Body, BodyId, BodySpec};
use super::boundary::{BoundarySide, StaticBody, build_trough};
use super::collision::{
    circle_circle, circle_slab, resolve_pair, resolve_static, settle_static,
};
use crate::consts::{AIR_FRICTION, GRAVITY_SCALE, SOLVER_ITERATIONS};

/// Read-only view of any body in the world
#[derive(Debug, Clone, Copy)]
pub enum BodyView<'a> {
    Dynamic(&'a Body),
    Static(&'a StaticBody),
}

impl BodyView<'_> {
    pub fn id(&self) -> BodyId {
        match self {
            BodyView::Dynamic(b) => b.id,
            BodyView::Static(s) => s.id,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, BodyView::Static(_))
    }

    pub fn position(&self) -> Vec2 {
        match self {
            BodyView::Dynamic(b) => b.pos,
            BodyView::Static(s) => s.center(),
        }
    }
}

/// The simulation world
#[derive(Debug)]
pub struct World {
    /// Gravity in "g" units; scaled by `gravity_scale` into pixels/s²
    gravity: Vec2,
    gravity_scale: f32,
    /// Dynamic bodies, in insertion (and therefore id) order
    bodies: Vec<Body>,
    /// Floor and walls, fixed at construction
    boundaries: Vec<StaticBody>,
    /// Viewport the boundaries were built for
    extent: Vec2,
    next_id: u32,
    ticks: u64,
    // Broad-phase scratch, reused across steps
    sweep_order: Vec<usize>,
    pairs: Vec<(usize, usize)>,
}

impl World {
    /// Create a world with its trough built for a `width` x `height` viewport
    pub fn new(width: f32, height: f32) -> Self {
        let mut next_id = 1;
        let boundaries = build_trough(width, height, || {
            let id = BodyId(next_id);
            next_id += 1;
            id
        });

        Self {
            gravity: Vec2::new(0.0, 1.0),
            gravity_scale: GRAVITY_SCALE,
            bodies: Vec::new(),
            boundaries: boundaries.into(),
            extent: Vec2::new(width, height),
            next_id,
            ticks: 0,
            sweep_order: Vec::new(),
            pairs: Vec::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    /// Viewport size the boundaries were built for
    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Physics ticks advanced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Insert a dynamic body. Malformed specs are refused with a warning.
    pub fn add_body(&mut self, spec: BodySpec) -> Option<BodyId> {
        if let Some(reason) = spec.defect() {
            log::warn!("Refusing body: {reason}");
            return None;
        }
        let id = BodyId(self.next_id);
        let body = Body::from_spec(id, &spec)?;
        self.next_id += 1;
        self.bodies.push(body);
        Some(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        // Ids are handed out in increasing order
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn dynamic_bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn dynamic_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn boundaries(&self) -> &[StaticBody] {
        &self.boundaries
    }

    pub fn boundary(&self, side: BoundarySide) -> Option<&StaticBody> {
        self.boundaries.iter().find(|b| b.side == side)
    }

    /// Snapshot of every body, boundaries first
    pub fn all_bodies(&self) -> impl Iterator<Item = BodyView<'_>> {
        self.boundaries
            .iter()
            .map(BodyView::Static)
            .chain(self.bodies.iter().map(BodyView::Dynamic))
    }

    /// Drop every body, boundaries included (session teardown)
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.boundaries.clear();
        self.sweep_order.clear();
        self.pairs.clear();
    }

    /// Advance the simulation by `dt` seconds. Non-positive `dt` is a no-op.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let accel = self.gravity * self.gravity_scale;
        let damping = (1.0 - AIR_FRICTION * dt).max(0.0);
        for body in &mut self.bodies {
            body.integrate(accel, damping, dt);
        }

        self.collect_pairs();

        for _ in 0..SOLVER_ITERATIONS {
            for &(i, j) in &self.pairs {
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                let contact = circle_circle(a.pos, a.radius(), b.pos, b.radius());
                if contact.hit {
                    resolve_pair(a, b, &contact);
                }
            }

            for body in &mut self.bodies {
                for wall in &self.boundaries {
                    let contact = circle_slab(body.pos, body.radius(), wall);
                    if contact.hit {
                        resolve_static(body, wall, &contact);
                    }
                }
            }
        }

        // No body ends the tick inside a boundary
        for body in &mut self.bodies {
            for wall in &self.boundaries {
                let contact = circle_slab(body.pos, body.radius(), wall);
                if contact.hit {
                    settle_static(body, &contact);
                }
            }
        }

        self.ticks += 1;
    }

    /// Sort-and-sweep along x: candidate pairs whose bounds overlap
    fn collect_pairs(&mut self) {
        let bodies = &self.bodies;
        self.sweep_order.clear();
        self.sweep_order.extend(0..bodies.len());
        self.sweep_order
            .sort_unstable_by(|&a, &b| min_x(&bodies[a]).total_cmp(&min_x(&bodies[b])));

        self.pairs.clear();
        for (k, &i) in self.sweep_order.iter().enumerate() {
            let a = &bodies[i];
            let max_x = a.pos.x + a.radius();
            for &j in &self.sweep_order[k + 1..] {
                let b = &bodies[j];
                if min_x(b) > max_x {
                    break;
                }
                if (a.pos.y - b.pos.y).abs() <= a.radius() + b.radius() {
                    self.pairs.push((i.min(j), i.max(j)));
                }
            }
        }
        // Stable resolution order regardless of sort
        self.pairs.sort_unstable();
    }
}

#[inline]
fn min_x(body: &Body) -> f32 {
    body.pos.x - body.radius()
}

/// Two distinct mutable bodies, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Glyph;

    fn spec_at(x: f32, y: f32) -> BodySpec {
        BodySpec::new(Vec2::new(x, y), 40.0, Glyph::new("🥤").unwrap())
    }

    #[test]
    fn test_new_world_has_trough_only() {
        let world = World::new(800.0, 600.0);
        assert_eq!(world.dynamic_count(), 0);
        assert_eq!(world.boundaries().len(), 3);
        assert!(world.all_bodies().all(|b| b.is_static()));
        assert_eq!(world.gravity(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_add_body_assigns_increasing_ids() {
        let mut world = World::new(800.0, 600.0);
        let a = world.add_body(spec_at(100.0, 100.0)).unwrap();
        let b = world.add_body(spec_at(200.0, 100.0)).unwrap();
        assert!(b > a);
        // Boundary ids come first
        assert!(world.boundaries().iter().all(|s| s.id < a));
        assert_eq!(world.body(b).map(|body| body.pos.x), Some(200.0));
        assert_eq!(world.dynamic_count(), 2);
    }

    #[test]
    fn test_malformed_body_is_a_silent_noop() {
        let mut world = World::new(800.0, 600.0);
        let bad = BodySpec {
            radius: 0.0,
            ..spec_at(10.0, 10.0)
        };
        assert_eq!(world.add_body(bad), None);
        assert_eq!(world.dynamic_count(), 0);
        // A refused spec does not burn an id
        let id = world.add_body(spec_at(10.0, 10.0)).unwrap();
        assert_eq!(id, BodyId(4));
    }

    #[test]
    fn test_step_zero_is_identity() {
        let mut world = World::new(800.0, 600.0);
        // Overlapping pair plus one sinking into the floor
        world.add_body(spec_at(100.0, 100.0).with_velocity(Vec2::new(3.0, -2.0)));
        world.add_body(spec_at(110.0, 100.0).with_angle(1.0));
        world.add_body(spec_at(400.0, 595.0));

        let before: Vec<_> = world
            .dynamic_bodies()
            .iter()
            .map(|b| (b.pos, b.vel, b.angle, b.angular_vel))
            .collect();
        world.step(0.0);
        world.step(-1.0);
        world.step(f32::NAN);
        let after: Vec<_> = world
            .dynamic_bodies()
            .iter()
            .map(|b| (b.pos, b.vel, b.angle, b.angular_vel))
            .collect();

        assert_eq!(before, after);
        assert_eq!(world.ticks(), 0);
    }

    #[test]
    fn test_gravity_accelerates_bodies() {
        let mut world = World::new(800.0, 600.0);
        let id = world.add_body(spec_at(400.0, 0.0)).unwrap();
        world.step(1.0 / 60.0);
        let body = world.body(id).unwrap();
        assert!(body.vel.y > 0.0);
        assert!(body.pos.y > 0.0);
        assert_eq!(world.ticks(), 1);
    }

    #[test]
    fn test_sideways_gravity() {
        let mut world = World::new(800.0, 600.0);
        world.set_gravity(Vec2::new(-1.0, 0.5));
        let id = world.add_body(spec_at(400.0, 100.0)).unwrap();
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(id).unwrap();
        assert!(body.pos.x < 400.0);
        assert!(body.pos.y > 100.0);
    }

    #[test]
    fn test_body_settles_on_floor() {
        let mut world = World::new(800.0, 600.0);
        let id = world.add_body(spec_at(400.0, -60.0)).unwrap();
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(id).unwrap();
        // Radius 20, floor top at 600
        assert!((body.pos.y - 580.0).abs() < 2.0, "y = {}", body.pos.y);
        assert!(body.vel.length() < 20.0);
    }

    #[test]
    fn test_sunken_body_returns_above_floor() {
        let mut world = World::new(800.0, 600.0);
        // Below the floor slab's midline (y = 650)
        let id = world.add_body(spec_at(400.0, 680.0)).unwrap();
        world.step(1.0 / 60.0);
        let body = world.body(id).unwrap();
        assert!(body.pos.y <= 580.0 + 1e-3, "y = {}", body.pos.y);
        assert!(body.vel.y <= 0.0);
    }

    #[test]
    fn test_walls_contain_bodies() {
        let mut world = World::new(800.0, 600.0);
        world.set_gravity(Vec2::new(1.0, 0.5));
        let id = world.add_body(spec_at(700.0, 500.0)).unwrap();
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(id).unwrap();
        assert!(body.pos.x <= 800.0 - 20.0 + 2.0, "x = {}", body.pos.x);
    }

    #[test]
    fn test_overlapping_bodies_pushed_apart() {
        let mut world = World::new(800.0, 600.0);
        world.set_gravity(Vec2::ZERO);
        let a = world.add_body(spec_at(300.0, 300.0)).unwrap();
        let b = world.add_body(spec_at(310.0, 300.0)).unwrap();
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (a, b) = (world.body(a).unwrap(), world.body(b).unwrap());
        assert!(a.pos.distance(b.pos) >= 40.0 - 1.0);
    }

    #[test]
    fn test_pile_stays_in_trough() {
        let mut world = World::new(400.0, 300.0);
        for i in 0..60 {
            let x = 20.0 + (i % 9) as f32 * 40.0;
            let y = -40.0 * (i / 9) as f32;
            world.add_body(spec_at(x, y));
        }
        for _ in 0..900 {
            world.step(1.0 / 60.0);
        }
        for body in world.dynamic_bodies() {
            assert!(
                body.pos.y < 300.0,
                "body {:?} fell through at y = {}",
                body.id,
                body.pos.y
            );
            assert!(body.pos.x > 0.0 && body.pos.x < 400.0);
        }
    }

    #[test]
    fn test_all_bodies_lists_statics_first() {
        let mut world = World::new(800.0, 600.0);
        world.add_body(spec_at(100.0, 100.0));
        let views: Vec<_> = world.all_bodies().collect();
        assert_eq!(views.len(), 4);
        assert!(views[..3].iter().all(|v| v.is_static()));
        assert!(!views[3].is_static());
        assert_eq!(views[3].position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_clear_empties_world() {
        let mut world = World::new(800.0, 600.0);
        world.add_body(spec_at(100.0, 100.0));
        world.clear();
        assert_eq!(world.all_bodies().count(), 0);
    }
}
