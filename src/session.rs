//! Simulation session
//!
//! A session exclusively owns one world plus everything that drives it: the
//! spawner, the input adapters and their event sources, the physics and spawn
//! tickers, the render loop and the canvas. Hosts create one per view and
//! call `teardown` when the view goes away, so a re-created view never shares
//! or duplicates a world.

use crate::config::SimConfig;
use crate::consts::MAX_FRAME_MS;
use crate::input::{
    EventSource, ForceField, OrientationSample, PointerPress, PointerSpawner, ResizeCoordinator,
    ResizeNotice, Viewport,
};
use crate::renderer::{Canvas, RenderLoop, SurfaceSize};
use crate::sched::Ticker;
use crate::sim::{BodyId, SpawnOutcome, Spawner, World};

/// What one `update` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub events: usize,
    pub physics_ticks: u32,
    pub spawn_attempts: u32,
}

pub struct Session<C: Canvas> {
    world: World,
    spawner: Spawner,
    force_field: ForceField,
    pointer: PointerSpawner,
    resizer: ResizeCoordinator,
    render: RenderLoop,
    physics: Ticker,
    spawn_timer: Ticker,
    physics_dt: f32,
    last_update_ms: Option<f64>,
    canvas: C,
    viewport: Box<dyn Viewport>,
    orientation_events: Option<Box<dyn EventSource<OrientationSample>>>,
    pointer_events: Option<Box<dyn EventSource<PointerPress>>>,
    resize_events: Option<Box<dyn EventSource<ResizeNotice>>>,
    active: bool,
}

impl<C: Canvas> Session<C> {
    /// Size the canvas to the viewport, build the world and its trough,
    /// seed the startup batch and start every scheduler
    pub fn new(
        config: &SimConfig,
        mut canvas: C,
        viewport: impl Viewport + 'static,
        seed: u64,
    ) -> Self {
        let config = config.clone().sanitized();
        match config.to_json() {
            Ok(json) => log::debug!("Effective config: {json}"),
            Err(e) => log::warn!("Could not serialize config: {e}"),
        }
        let resizer = ResizeCoordinator;
        let size = resizer.handle(&viewport, &mut canvas);
        let (width, height) = (size.width as f32, size.height as f32);

        let mut world = World::new(width, height);
        world.set_gravity(config.initial_gravity);
        world.set_gravity_scale(config.gravity_scale);

        let mut spawner = Spawner::new(&config, width, seed);
        let seeded = spawner.seed_initial(&mut world);

        let mut physics = Ticker::new(config.physics_period_ms(), config.max_substeps);
        let mut spawn_timer = Ticker::new(config.spawn_period_ms, config.max_substeps);
        let mut render = RenderLoop::new();
        physics.start();
        spawn_timer.start();
        render.start();

        log::info!(
            "Session started: {}x{} viewport, seed {}, {} bodies seeded, ceiling {}",
            size.width,
            size.height,
            seed,
            seeded,
            config.max_bodies
        );

        Self {
            world,
            spawner,
            force_field: ForceField::new(&config),
            pointer: PointerSpawner::new(&config, seed.wrapping_add(1)),
            resizer,
            render,
            physics,
            spawn_timer,
            physics_dt: config.physics_dt(),
            last_update_ms: None,
            canvas,
            viewport: Box::new(viewport),
            orientation_events: None,
            pointer_events: None,
            resize_events: None,
            active: true,
        }
    }

    pub fn attach_orientation(&mut self, source: impl EventSource<OrientationSample> + 'static) {
        self.orientation_events = Some(Box::new(source));
    }

    pub fn attach_pointer(&mut self, source: impl EventSource<PointerPress> + 'static) {
        self.pointer_events = Some(Box::new(source));
    }

    pub fn attach_resize(&mut self, source: impl EventSource<ResizeNotice> + 'static) {
        self.resize_events = Some(Box::new(source));
    }

    /// Register the live-count observer, called after every spawn attempt
    pub fn set_count_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.spawner.set_observer(observer);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply an orientation sample. Returns whether gravity changed.
    pub fn on_orientation(&mut self, sample: OrientationSample) -> bool {
        self.active && self.force_field.apply(&mut self.world, sample)
    }

    /// Drop a body at the press position, ceiling or not
    pub fn on_pointer_press(&mut self, press: PointerPress) -> Option<BodyId> {
        if !self.active {
            return None;
        }
        self.pointer.press(&mut self.world, press)
    }

    /// Resync the canvas with the viewport. The trough is not rebuilt.
    pub fn on_resize(&mut self) -> SurfaceSize {
        self.resizer.handle(self.viewport.as_ref(), &mut self.canvas)
    }

    /// Drain every attached source, applying events in arrival order per
    /// source. Returns how many events were handled.
    pub fn pump_events(&mut self) -> usize {
        if !self.active {
            return 0;
        }
        let mut handled = 0;

        if let Some(source) = self.orientation_events.as_mut() {
            while let Some(sample) = source.poll_event() {
                self.force_field.apply(&mut self.world, sample);
                handled += 1;
            }
        }
        if let Some(source) = self.pointer_events.as_mut() {
            while let Some(press) = source.poll_event() {
                self.pointer.press(&mut self.world, press);
                handled += 1;
            }
        }
        if let Some(source) = self.resize_events.as_mut() {
            let mut resized = false;
            while source.poll_event().is_some() {
                resized = true;
                handled += 1;
            }
            // The viewport is re-queried anyway, so a burst needs one pass
            if resized {
                self.resizer.handle(self.viewport.as_ref(), &mut self.canvas);
            }
        }
        handled
    }

    /// Advance the world by exactly one fixed tick
    pub fn physics_tick(&mut self) {
        if self.active {
            self.world.step(self.physics_dt);
        }
    }

    /// Make one spawn attempt (reports the count to the observer)
    pub fn spawn_tick(&mut self) -> Option<SpawnOutcome> {
        if !self.active {
            return None;
        }
        Some(self.spawner.attempt(&mut self.world))
    }

    /// Pump input, then run the physics ticks and spawn attempts that came
    /// due since the previous call. The first call only sets the baseline.
    pub fn update(&mut self, now_ms: f64) -> UpdateReport {
        if !self.active {
            return UpdateReport::default();
        }
        let events = self.pump_events();

        let elapsed = match self.last_update_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_update_ms = Some(now_ms);

        let physics_ticks = self.physics.advance(elapsed);
        for _ in 0..physics_ticks {
            self.world.step(self.physics_dt);
        }

        let spawn_attempts = self.spawn_timer.advance(elapsed);
        for _ in 0..spawn_attempts {
            self.spawner.attempt(&mut self.world);
        }

        UpdateReport {
            events,
            physics_ticks,
            spawn_attempts,
        }
    }

    /// Paint one frame. Returns `false` once the render loop is stopped.
    pub fn render_frame(&mut self, now_ms: f64) -> bool {
        self.render.frame(now_ms, &self.world, &mut self.canvas)
    }

    /// Stop every scheduler, detach every source and the observer, and drop
    /// all bodies. Idempotent.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.physics.stop();
        self.spawn_timer.stop();
        self.render.stop();
        self.orientation_events = None;
        self.pointer_events = None;
        self.resize_events = None;
        self.spawner.clear_observer();
        self.world.clear();
        log::info!("Session torn down");
    }
}

impl<C: Canvas> Drop for Session<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
