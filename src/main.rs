//! Trash Rain entry point
//!
//! On the web this wires the DOM (canvas, orientation, mouse, resize, timers)
//! to a `Session`. Natively it runs a short headless simulation and logs the
//! population as it grows.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, DeviceOrientationEvent, EventTarget, HtmlCanvasElement,
        MouseEvent,
    };

    use trash_rain::input::{
        EventQueue, OrientationSample, PointerButton, PointerPress, ResizeNotice, Viewport,
    };
    use trash_rain::renderer::{Painter, Surface, SurfaceSize};
    use trash_rain::sched::Clock;
    use trash_rain::{DamageLevel, Session, SimConfig};

    const CANVAS_ID: &str = "trash-rain-canvas";
    const OVERLAY_STYLE: &str = "position:fixed;inset:0;pointer-events:none;";

    /// 2D canvas the session paints on
    pub struct CanvasTarget {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasTarget {
        fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let ctx = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into::<CanvasRenderingContext2d>()?;
            Ok(Self { canvas, ctx })
        }
    }

    impl Surface for CanvasTarget {
        fn size(&self) -> SurfaceSize {
            SurfaceSize::new(self.canvas.width(), self.canvas.height())
        }

        fn set_size(&mut self, size: SurfaceSize) {
            self.canvas.set_width(size.width);
            self.canvas.set_height(size.height);
        }
    }

    impl Painter for CanvasTarget {
        fn clear(&mut self, size: SurfaceSize) {
            self.ctx
                .clear_rect(0.0, 0.0, size.width as f64, size.height as f64);
        }

        fn save(&mut self) {
            self.ctx.save();
        }

        fn translate(&mut self, x: f32, y: f32) {
            let _ = self.ctx.translate(x as f64, y as f64);
        }

        fn rotate(&mut self, angle: f32) {
            let _ = self.ctx.rotate(angle as f64);
        }

        fn fill_glyph(&mut self, glyph: &str, size_px: f32) {
            self.ctx.set_font(&format!("{size_px}px Arial"));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.ctx.set_fill_style_str("white");
            let _ = self.ctx.fill_text(glyph, 0.0, 0.0);
        }

        fn restore(&mut self) {
            self.ctx.restore();
        }
    }

    /// Browser window inner size
    struct WindowViewport {
        window: web_sys::Window,
    }

    impl Viewport for WindowViewport {
        fn viewport_size(&self) -> (i32, i32) {
            let dim = |v: Result<JsValue, JsValue>| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as i32
            };
            (dim(self.window.inner_width()), dim(self.window.inner_height()))
        }
    }

    /// `performance.now()`
    struct PerformanceClock {
        performance: Option<web_sys::Performance>,
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            match &self.performance {
                Some(p) => p.now(),
                None => js_sys::Date::now(),
            }
        }
    }

    type SharedSession = Rc<RefCell<Session<CanvasTarget>>>;
    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    /// Everything registered with the browser for one session. Dropping it
    /// unregisters all of it and tears the session down.
    struct Host {
        window: web_sys::Window,
        session: SharedSession,
        listeners: Vec<Listener>,
        interval: Option<(i32, Closure<dyn FnMut()>)>,
        frame_handle: Rc<Cell<Option<i32>>>,
        frame_callback: FrameCallback,
    }

    impl Drop for Host {
        fn drop(&mut self) {
            for listener in self.listeners.drain(..) {
                let _ = listener.target.remove_event_listener_with_callback(
                    listener.kind,
                    listener.closure.as_ref().unchecked_ref(),
                );
            }
            if let Some((handle, _closure)) = self.interval.take() {
                self.window.clear_interval_with_handle(handle);
            }
            if let Some(handle) = self.frame_handle.take() {
                let _ = self.window.cancel_animation_frame(handle);
            }
            // Breaks the self-referencing rAF chain
            self.frame_callback.borrow_mut().take();
            if let Ok(mut session) = self.session.try_borrow_mut() {
                session.teardown();
            }
        }
    }

    thread_local! {
        static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
    }

    /// Drain queued input now, unless the session is busy (the next update
    /// will pick the events up)
    fn pump(session: &SharedSession) {
        if let Ok(mut session) = session.try_borrow_mut() {
            session.pump_events();
        }
    }

    fn listen(
        listeners: &mut Vec<Listener>,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            Ok(()) => listeners.push(Listener {
                target: target.clone(),
                kind,
                closure,
            }),
            Err(e) => log::warn!("Could not listen for {kind}: {e:?}"),
        }
    }

    fn find_or_create_canvas(document: &web_sys::Document) -> Result<HtmlCanvasElement, JsValue> {
        if let Some(el) = document.get_element_by_id(CANVAS_ID) {
            return el.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from);
        }
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        canvas.set_id(CANVAS_ID);
        // Full-viewport overlay that lets clicks through to the page
        canvas.set_attribute("style", OVERLAY_STYLE)?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&canvas)?;
        Ok(canvas)
    }

    pub fn start() -> Result<(), JsValue> {
        // A re-created view never shares the previous world
        stop();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let config = SimConfig::load().sanitized();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let canvas = find_or_create_canvas(&document)?;
        let target = CanvasTarget::new(canvas.clone())?;
        let viewport = WindowViewport {
            window: window.clone(),
        };

        let mut session = Session::new(&config, target, viewport, seed);

        let tilt = EventQueue::new();
        let presses = EventQueue::new();
        let resizes = EventQueue::new();
        session.attach_orientation(tilt.clone());
        session.attach_pointer(presses.clone());
        session.attach_resize(resizes.clone());

        let body = document.body();
        session.set_count_observer(move |count| {
            let level = DamageLevel::from_count(count);
            if let Some(body) = &body {
                let _ = body.set_attribute("data-debris-count", &count.to_string());
                let _ = body.set_attribute("data-damage", &level.tier().to_string());
            }
        });

        let session: SharedSession = Rc::new(RefCell::new(session));
        let mut listeners = Vec::new();

        {
            let session = session.clone();
            listen(&mut listeners, &window, "deviceorientation", move |event| {
                let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() else {
                    return;
                };
                tilt.push(OrientationSample {
                    gamma: event.gamma().map(|v| v as f32),
                    beta: event.beta().map(|v| v as f32),
                });
                pump(&session);
            });
        }
        {
            let session = session.clone();
            let canvas = canvas.clone();
            // The overlay ignores pointer events, so presses are taken from the window
            listen(&mut listeners, &window, "mousedown", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = canvas.get_bounding_client_rect();
                presses.push(PointerPress::from_client(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    Vec2::new(rect.left() as f32, rect.top() as f32),
                    PointerButton::from_dom(event.button()),
                ));
                pump(&session);
            });
        }
        {
            let session = session.clone();
            listen(&mut listeners, &window, "resize", move |_event| {
                resizes.push(ResizeNotice);
                pump(&session);
            });
        }

        // Physics and spawning run on a timer independent of display refresh
        let clock = PerformanceClock {
            performance: window.performance(),
        };
        let interval = {
            let session = session.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Ok(mut session) = session.try_borrow_mut() {
                    session.update(clock.now_ms());
                }
            });
            let period = config.physics_period_ms().round().max(1.0) as i32;
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period,
            ) {
                Ok(handle) => Some((handle, closure)),
                Err(e) => {
                    log::error!("Could not start the physics timer: {e:?}");
                    None
                }
            }
        };

        let frame_handle = Rc::new(Cell::new(None));
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        {
            let session = session.clone();
            let window = window.clone();
            let handle = frame_handle.clone();
            let next = frame_callback.clone();
            *frame_callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                let keep_going = match session.try_borrow_mut() {
                    Ok(mut session) => session.render_frame(time),
                    Err(_) => true,
                };
                handle.set(None);
                if !keep_going {
                    return;
                }
                if let Some(callback) = next.borrow().as_ref() {
                    handle.set(
                        window
                            .request_animation_frame(callback.as_ref().unchecked_ref())
                            .ok(),
                    );
                }
            }));
        }
        if let Some(callback) = frame_callback.borrow().as_ref() {
            frame_handle.set(
                window
                    .request_animation_frame(callback.as_ref().unchecked_ref())
                    .ok(),
            );
        }

        HOST.with(|host| {
            *host.borrow_mut() = Some(Host {
                window,
                session,
                listeners,
                interval,
                frame_handle,
                frame_callback,
            });
        });
        log::info!("Trash Rain running (seed {seed})");
        Ok(())
    }

    pub fn stop() {
        let previous = HOST.with(|host| host.borrow_mut().take());
        if previous.is_some() {
            drop(previous);
            log::info!("Trash Rain stopped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger init failed: {e}")));
    }
    log::info!("Trash Rain starting...");
    web_host::start().inspect_err(|e| log::error!("Startup failed: {e:?}"))
}

/// Start (or restart) the simulation on the page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn restart() -> Result<(), JsValue> {
    web_host::start().inspect_err(|e| log::error!("Restart failed: {e:?}"))
}

/// Tear the simulation down and release every browser registration
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop() {
    web_host::stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;

    use trash_rain::input::{EventQueue, ManualViewport, OrientationSample};
    use trash_rain::renderer::{RecordingCanvas, SurfaceSize};
    use trash_rain::sched::{Clock, ManualClock};
    use trash_rain::{DamageLevel, Session, SimConfig};

    const RUN_SECONDS: u32 = 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Trash Rain (native, headless) starting...");

    let config = SimConfig::load().sanitized();
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let canvas = RecordingCanvas::headless(SurfaceSize::new(800, 600));
    let mut session = Session::new(&config, canvas, ManualViewport::new(800, 600), seed);

    let count = Rc::new(Cell::new(session.world().dynamic_count()));
    {
        let count = count.clone();
        session.set_count_observer(move |n| count.set(n));
    }
    let tilt = EventQueue::new();
    session.attach_orientation(tilt.clone());

    let clock = ManualClock::new(0.0);
    session.update(clock.now_ms());
    let frames_per_second = (1000.0 / FRAME_MS).round() as u32;

    for second in 1..=RUN_SECONDS {
        // Halfway through, tip the device to the right
        if second == RUN_SECONDS / 2 {
            tilt.push(OrientationSample::new(30.0, 20.0));
        }
        for _ in 0..frames_per_second {
            clock.advance(FRAME_MS);
            session.update(clock.now_ms());
            session.render_frame(clock.now_ms());
        }
        let n = count.get();
        log::info!(
            "t={second}s bodies={n} damage={} gravity={:?} fps={}",
            DamageLevel::from_count(n).as_str(),
            session.world().gravity(),
            session.render_loop().stats().fps()
        );
    }

    log::info!(
        "Done: {} bodies, {} glyphs painted",
        session.world().dynamic_count(),
        session.canvas().glyphs_painted()
    );
    session.teardown();
}
