//! End-to-end session behavior driven by synthetic input and a manual clock

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use proptest::prelude::*;

use trash_rain::input::{EventQueue, ManualViewport, OrientationSample, PointerPress, ResizeNotice};
use trash_rain::renderer::{RecordingCanvas, Surface, SurfaceSize};
use trash_rain::sched::{Clock, ManualClock};
use trash_rain::sim::BoundarySide;
use trash_rain::{DamageLevel, Session, SimConfig};

fn config(max_bodies: usize, initial_bodies: usize) -> SimConfig {
    SimConfig {
        max_bodies,
        initial_bodies,
        ..SimConfig::default()
    }
}

fn session_with(config: &SimConfig, viewport: ManualViewport) -> Session<RecordingCanvas> {
    let canvas = RecordingCanvas::headless(SurfaceSize::new(1, 1));
    Session::new(config, canvas, viewport, 42)
}

fn record_counts(session: &mut Session<RecordingCanvas>) -> Rc<RefCell<Vec<usize>>> {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = reports.clone();
    session.set_count_observer(move |count| sink.borrow_mut().push(count));
    reports
}

#[test]
fn ceiling_scenario_reports_five_from_tick_five() {
    let mut session = session_with(&config(5, 0), ManualViewport::new(800, 600));
    let reports = record_counts(&mut session);
    let clock = ManualClock::new(0.0);

    session.update(clock.now_ms());
    for _ in 0..10 {
        clock.advance(100.0);
        let report = session.update(clock.now_ms());
        assert_eq!(report.spawn_attempts, 1);
    }

    assert_eq!(session.world().dynamic_count(), 5);
    assert_eq!(*reports.borrow(), vec![1, 2, 3, 4, 5, 5, 5, 5, 5, 5]);
}

#[test]
fn pointer_press_at_ceiling_still_adds_a_body() {
    let mut session = session_with(&config(5, 0), ManualViewport::new(800, 600));
    for _ in 0..5 {
        session.spawn_tick();
    }
    assert_eq!(session.world().dynamic_count(), 5);

    let presses = EventQueue::new();
    session.attach_pointer(presses.clone());
    presses.push(PointerPress::primary(100.0, 200.0));
    assert_eq!(session.pump_events(), 1);

    assert_eq!(session.world().dynamic_count(), 6);
    let newest = session
        .world()
        .dynamic_bodies()
        .last()
        .expect("pointer body");
    assert_eq!(newest.pos, Vec2::new(100.0, 200.0));

    // The periodic path stays blocked while over the ceiling
    session.spawn_tick();
    assert_eq!(session.world().dynamic_count(), 6);
}

#[test]
fn orientation_samples_steer_gravity() {
    let mut session = session_with(&config(10, 0), ManualViewport::new(800, 600));
    let tilt = EventQueue::new();
    session.attach_orientation(tilt.clone());

    tilt.push(OrientationSample::new(90.0, 0.0));
    session.pump_events();
    assert_eq!(session.world().gravity(), Vec2::new(1.0, 0.5));

    tilt.push(OrientationSample {
        gamma: None,
        beta: Some(10.0),
    });
    tilt.push(OrientationSample {
        gamma: Some(-20.0),
        beta: None,
    });
    session.pump_events();
    assert_eq!(session.world().gravity(), Vec2::new(1.0, 0.5));

    tilt.push(OrientationSample::new(-90.0, -45.0));
    session.pump_events();
    assert_eq!(session.world().gravity(), Vec2::new(-1.0, 1.5));
}

#[test]
fn resize_updates_surface_and_keeps_bodies() {
    let viewport = ManualViewport::new(800, 600);
    let mut session = session_with(&config(500, 20), viewport.clone());
    let resizes = EventQueue::new();
    session.attach_resize(resizes.clone());
    assert_eq!(session.canvas().size(), SurfaceSize::new(800, 600));

    viewport.set(400, 300);
    resizes.push(ResizeNotice);
    session.pump_events();

    assert_eq!(session.canvas().size(), SurfaceSize::new(400, 300));
    assert_eq!(session.world().dynamic_count(), 20);
}

#[test]
fn boundaries_stay_at_startup_geometry_after_resize() {
    let viewport = ManualViewport::new(800, 600);
    let mut session = session_with(&config(500, 0), viewport.clone());
    let floor_top = |s: &Session<RecordingCanvas>| {
        s.world()
            .boundary(BoundarySide::Floor)
            .map(|floor| floor.top())
            .expect("floor")
    };
    assert_eq!(floor_top(&session), 600.0);

    viewport.set(400, 300);
    session.on_resize();
    assert_eq!(session.canvas().size(), SurfaceSize::new(400, 300));
    assert_eq!(floor_top(&session), 600.0);
    assert_eq!(session.world().extent(), Vec2::new(800.0, 600.0));

    // A body dropped into the smaller view settles on the old floor, out of sight
    let id = session
        .on_pointer_press(PointerPress::primary(200.0, 250.0))
        .expect("pointer body");
    let clock = ManualClock::new(0.0);
    session.update(clock.now_ms());
    for _ in 0..300 {
        clock.advance(1000.0 / 60.0);
        session.update(clock.now_ms());
    }
    let body = session.world().body(id).expect("body survives");
    assert!(body.pos.y > 300.0, "y = {}", body.pos.y);
    assert!(body.pos.y < 600.0, "y = {}", body.pos.y);
}

#[test]
fn rendering_paints_every_dynamic_body() {
    let mut session = session_with(&config(500, 20), ManualViewport::new(800, 600));
    assert!(session.render_frame(16.0));
    assert_eq!(session.canvas().glyphs_painted(), 20);
    assert_eq!(session.render_loop().stats().last_painted(), 20);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut session = session_with(&SimConfig::default(), ManualViewport::new(800, 600));
        let clock = ManualClock::new(0.0);
        session.update(clock.now_ms());
        for _ in 0..120 {
            clock.advance(1000.0 / 60.0);
            session.update(clock.now_ms());
        }
        session
            .world()
            .dynamic_bodies()
            .iter()
            .map(|b| (b.id, b.pos, b.angle))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn bodies_stay_in_the_trough() {
    let mut session = session_with(&SimConfig::default(), ManualViewport::new(800, 600));
    let clock = ManualClock::new(0.0);
    session.update(clock.now_ms());
    for _ in 0..600 {
        clock.advance(1000.0 / 60.0);
        session.update(clock.now_ms());
    }
    for body in session.world().dynamic_bodies() {
        assert!(body.pos.is_finite());
        assert!(body.pos.y < 600.0, "{:?} fell through the floor", body.id);
        assert!((0.0..=800.0).contains(&body.pos.x), "{:?} escaped sideways", body.id);
    }
}

#[test]
fn full_pile_never_leaks_through_the_trough() {
    let mut session = session_with(&SimConfig::default(), ManualViewport::new(800, 600));
    let floor_top = session
        .world()
        .boundary(BoundarySide::Floor)
        .map(|floor| floor.top())
        .expect("floor");
    let clock = ManualClock::new(0.0);
    session.update(clock.now_ms());

    let check = |session: &Session<RecordingCanvas>, when: &str| {
        for body in session.world().dynamic_bodies() {
            assert!(body.pos.is_finite(), "{:?} blew up {when}", body.id);
            assert!(
                body.pos.y <= floor_top,
                "{:?} below the floor {when}: y = {}",
                body.id,
                body.pos.y
            );
            assert!(
                (0.0..=800.0).contains(&body.pos.x),
                "{:?} escaped sideways {when}: x = {}",
                body.id,
                body.pos.x
            );
        }
    };

    // Fill to the ceiling, roughly 48 seconds of spawning
    let mut frames = 0;
    while session.world().dynamic_count() < 500 {
        clock.advance(1000.0 / 60.0);
        session.update(clock.now_ms());
        frames += 1;
        assert!(frames < 60 * 120, "pile never reached the ceiling");
        if frames % 60 == 0 {
            check(&session, "while filling");
        }
    }
    check(&session, "at the ceiling");

    // Then let the full pile sit for another minute
    for frame in 1..=60 * 60 {
        clock.advance(1000.0 / 60.0);
        session.update(clock.now_ms());
        if frame % 60 == 0 {
            check(&session, "under a full pile");
        }
    }
    assert_eq!(session.world().dynamic_count(), 500);
}

#[test]
fn damage_follows_reported_count() {
    let mut session = session_with(&config(500, 95), ManualViewport::new(800, 600));
    let reports = record_counts(&mut session);
    for _ in 0..10 {
        session.spawn_tick();
    }
    let levels: Vec<_> = reports
        .borrow()
        .iter()
        .map(|&n| DamageLevel::from_count(n))
        .collect();
    assert_eq!(levels[3], DamageLevel::None);
    assert_eq!(levels[4], DamageLevel::Cracked);
}

#[test]
fn sessions_are_independent() {
    let mut a = session_with(&config(500, 3), ManualViewport::new(800, 600));
    let b = session_with(&config(500, 7), ManualViewport::new(800, 600));
    a.on_pointer_press(PointerPress::primary(10.0, 10.0));
    a.teardown();
    assert_eq!(a.world().dynamic_count(), 0);
    assert_eq!(b.world().dynamic_count(), 7);
}

proptest! {
    #[test]
    fn periodic_spawns_never_pass_the_ceiling(
        ceiling in 1usize..40,
        initial in 0usize..30,
        attempts in 0usize..60,
    ) {
        let mut session = session_with(&config(ceiling, initial), ManualViewport::new(800, 600));
        let seeded = session.world().dynamic_count();
        prop_assert_eq!(seeded, initial.min(ceiling));

        for _ in 0..attempts {
            session.spawn_tick();
            prop_assert!(session.world().dynamic_count() <= ceiling);
        }
        prop_assert_eq!(session.world().dynamic_count(), (seeded + attempts).min(ceiling));
    }

    #[test]
    fn pointer_presses_always_add_one(
        presses in prop::collection::vec((0.0f32..800.0, -100.0f32..600.0), 1..20),
    ) {
        let mut session = session_with(&config(3, 3), ManualViewport::new(800, 600));
        for (x, y) in presses {
            let before = session.world().dynamic_count();
            prop_assert!(session.on_pointer_press(PointerPress::primary(x, y)).is_some());
            prop_assert_eq!(session.world().dynamic_count(), before + 1);
        }
    }
}
