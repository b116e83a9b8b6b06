//! Antimatter entry point
//!
//! The browser build drives a [`Session`](antimatter::Session) from
//! `requestAnimationFrame` and wires the page's menus. The page is expected to
//! provide `#canvas`, `#debug`, `.start-menu` with a `.start-button`,
//! `.gameover-menu` with a `.restart-button`, and `#score`,
//! `#chasers_killed`, `#minders_killed` inside the game-over menu.
//!
//! The native build runs a headless session with a scripted pointer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use antimatter::diagnostics::{DiagnosticsReadout, TITLE};
    use antimatter::platform::{FrameHandle, FrameScheduler, IntervalHandle};
    use antimatter::renderer::{GpuRenderer, RenderState, Scene};
    use antimatter::sim::{Statistics, Viewport};
    use antimatter::ui::{GameOverSummary, SessionUi};
    use antimatter::{Session, Settings, Tuning};

    type WebSession = Session<GpuRenderer, DomUi, WebScheduler>;
    type GameSlot = Rc<RefCell<Option<Game>>>;

    /// Session plus the preferences the page can toggle
    struct Game {
        session: WebSession,
        settings: Settings,
    }

    impl Game {
        fn apply_settings(&mut self) {
            self.session
                .renderer_mut()
                .scene
                .apply_settings(&self.settings);
            self.session.ui().set_debug_visible(self.settings.show_debug);
            self.settings.save();
        }

        fn toggle_pause(&mut self) {
            let result = if self.session.is_running() {
                self.session.pause()
            } else {
                self.session.resume()
            };
            if let Err(e) = result {
                log::debug!("Pause toggle ignored: {}", e);
            }
        }
    }

    /// Menus and readouts in the host page
    struct DomUi {
        document: Document,
    }

    impl DomUi {
        fn set_hidden(&self, selector: &str, hidden: bool) {
            if let Ok(Some(el)) = self.document.query_selector(selector) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_debug_visible(&self, visible: bool) {
            self.set_hidden("#debug", !visible);
        }

        fn show_diagnostics(&self, readout: &DiagnosticsReadout) {
            let mut html = format!("<h3>{}</h3>", TITLE);
            for line in readout.lines() {
                html.push_str(&format!("<p>{}</p>", line));
            }
            if let Some(el) = self.document.get_element_by_id("debug") {
                el.set_inner_html(&html);
            }
        }
    }

    impl SessionUi for DomUi {
        fn on_start(&mut self) {
            self.set_hidden(".start-menu", true);
        }

        fn on_restart(&mut self) {
            self.set_hidden(".gameover-menu", true);
        }

        fn on_game_over(&mut self, frame: u64, statistics: &Statistics) {
            let summary = GameOverSummary::new(frame, statistics);
            self.set_text("score", &summary.score.to_string());
            self.set_text("chasers_killed", &summary.chasers());
            self.set_text("minders_killed", &summary.minders());
            self.set_hidden(".gameover-menu", false);
            log::info!("{}", summary);
        }
    }

    /// `requestAnimationFrame` / `setInterval` behind the session's scheduler
    struct WebScheduler {
        game: Weak<RefCell<Option<Game>>>,
        next_handle: i32,
        /// Our handle -> browser animation frame id
        frames: HashMap<FrameHandle, i32>,
        intervals: HashMap<IntervalHandle, (i32, Closure<dyn FnMut()>)>,
    }

    impl WebScheduler {
        fn new(game: &GameSlot) -> Self {
            Self {
                game: Rc::downgrade(game),
                next_handle: 0,
                frames: HashMap::new(),
                intervals: HashMap::new(),
            }
        }

        fn allocate(&mut self) -> i32 {
            self.next_handle += 1;
            self.next_handle
        }

        fn frame_fired(&mut self, handle: FrameHandle) {
            self.frames.remove(&handle);
        }
    }

    impl FrameScheduler for WebScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            let handle = FrameHandle(self.allocate());
            let game = self.game.clone();
            let closure = Closure::once(move |time: f64| {
                run_frame(&game, handle, time);
            });
            match web_sys::window()
                .map(|w| w.request_animation_frame(closure.as_ref().unchecked_ref()))
            {
                Some(Ok(id)) => {
                    self.frames.insert(handle, id);
                }
                Some(Err(e)) => log::error!("requestAnimationFrame failed: {:?}", e),
                None => log::error!("No window to schedule a frame on"),
            }
            closure.forget();
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(id) = self.frames.remove(&handle) {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }

        fn start_interval(&mut self, period_ms: u32) -> IntervalHandle {
            let handle = IntervalHandle(self.allocate());
            let game = self.game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                run_diagnostics(&game);
            });
            match web_sys::window().map(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms as i32,
                )
            }) {
                Some(Ok(id)) => {
                    self.intervals.insert(handle, (id, closure));
                }
                Some(Err(e)) => log::error!("setInterval failed: {:?}", e),
                None => log::error!("No window to start an interval on"),
            }
            handle
        }

        fn cancel_interval(&mut self, handle: IntervalHandle) {
            if let Some((id, _closure)) = self.intervals.remove(&handle) {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(id);
                }
            }
        }
    }

    fn run_frame(game: &Weak<RefCell<Option<Game>>>, handle: FrameHandle, time: f64) {
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut slot = game.borrow_mut();
        if let Some(g) = slot.as_mut() {
            g.session.scheduler_mut().frame_fired(handle);
            if let Err(e) = g.session.on_frame(handle, time) {
                log::error!("Frame failed: {}", e);
            }
        }
    }

    fn run_diagnostics(game: &Weak<RefCell<Option<Game>>>) {
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut slot = game.borrow_mut();
        if let Some(g) = slot.as_mut() {
            let readout = g.session.on_diagnostics_interval();
            if g.settings.show_debug {
                g.session.ui().show_diagnostics(&readout);
            }
        }
    }

    /// Size the canvas backing store for the current CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement, dpr: f64) -> (f64, f64) {
        let client_w = canvas.client_width() as f64;
        let client_h = canvas.client_height() as f64;
        canvas.set_width((client_w * dpr) as u32);
        canvas.set_height((client_h * dpr) as u32);
        (client_w, client_h)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Antimatter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let (width, height) = fit_canvas(&canvas, dpr);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            (width * dpr) as u32,
            (height * dpr) as u32,
        )
        .await;

        let settings = Settings::load();
        let renderer = GpuRenderer::new(Scene::new(width, height, &settings), render_state, dpr);

        let seed = js_sys::Date::now() as u64;
        let game: GameSlot = Rc::new(RefCell::new(None));
        let session = Session::new(
            renderer,
            DomUi {
                document: document.clone(),
            },
            WebScheduler::new(&game),
            Viewport::new(width, height),
            Tuning::default(),
            seed,
        );
        {
            let mut g = Game { session, settings };
            g.apply_settings();
            *game.borrow_mut() = Some(g);
        }

        log::info!("Session created with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());
        setup_resize(canvas, dpr, game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(game);

        log::info!("Antimatter ready, waiting for start");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: GameSlot) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(g) = game.borrow_mut().as_mut() {
                    g.session
                        .on_pointer(event.offset_x() as f64, event.offset_y() as f64);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    let y = touch.client_y() as f64 - rect.top();
                    if let Some(g) = game.borrow_mut().as_mut() {
                        g.session.on_pointer(x, y);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: GameSlot) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Ok(Some(btn)) = document.query_selector(".start-button") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(g) = game.borrow_mut().as_mut() {
                    if let Err(e) = g.session.start() {
                        log::warn!("Start ignored: {}", e);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Ok(Some(btn)) = document.query_selector(".restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                if let Some(g) = game.borrow_mut().as_mut() {
                    match g.session.restart(seed) {
                        Ok(()) => log::info!("Session restarted with seed: {}", seed),
                        Err(e) => log::error!("Restart failed: {}", e),
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, dpr: f64, game: GameSlot) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = fit_canvas(&canvas, dpr);
            if let Some(g) = game.borrow_mut().as_mut() {
                g.session.resize(w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: GameSlot) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut slot = game.borrow_mut();
            let Some(g) = slot.as_mut() else {
                return;
            };
            match event.key().as_str() {
                "Escape" | "p" => g.toggle_pause(),
                "t" => {
                    g.settings.trails = !g.settings.trails;
                    g.apply_settings();
                }
                "d" => {
                    g.settings.show_debug = !g.settings.show_debug;
                    g.apply_settings();
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: GameSlot) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    if let Some(g) = game.borrow_mut().as_mut() {
                        if g.settings.pause_on_blur && g.session.is_running() {
                            let _ = g.session.pause();
                            log::info!("Auto-paused (tab hidden)");
                        }
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if let Some(g) = game.borrow_mut().as_mut() {
                    if g.settings.pause_on_blur && g.session.is_running() {
                        let _ = g.session.pause();
                        log::info!("Auto-paused (window blur)");
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Antimatter (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => antimatter::Tuning::default(),
    };

    if let Err(e) = headless::run(tuning) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<antimatter::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(antimatter::Tuning::from_json(&json)?)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use antimatter::platform::ManualScheduler;
    use antimatter::renderer::Scene;
    use antimatter::sim::Viewport;
    use antimatter::ui::LogUi;
    use antimatter::{Session, SessionError, Settings, Tuning};

    const WIDTH: f64 = 1280.0;
    const HEIGHT: f64 = 720.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Frames to keep running after game over
    const AFTERMATH_FRAMES: u64 = 120;

    /// Run one session with the pointer circling the centre
    pub fn run(tuning: Tuning) -> Result<(), SessionError> {
        let settings = Settings::load();
        let mut session = Session::new(
            Scene::new(WIDTH, HEIGHT, &settings),
            LogUi,
            ManualScheduler::new(),
            Viewport::new(WIDTH, HEIGHT),
            tuning,
            0x5eed,
        );
        session.start()?;

        let mut frames = 0u64;
        let mut over_at = None;
        while let Some(handle) = session.scheduler_mut().take_frame() {
            let t = frames as f64 * FRAME_MS;
            let angle = t / 1500.0;
            session.on_pointer(
                WIDTH / 2.0 + angle.cos() * 300.0,
                HEIGHT / 2.0 + angle.sin() * 200.0,
            );
            session.on_frame(handle, t)?;
            frames += 1;

            if frames % 60 == 0 {
                log::info!("{}", session.on_diagnostics_interval());
            }
            if over_at.is_none() && session.world().is_some_and(|w| w.is_game_over()) {
                over_at = Some(frames);
            }
            if over_at.is_some_and(|at| frames >= at + AFTERMATH_FRAMES) || frames >= MAX_FRAMES {
                break;
            }
        }

        session.teardown();
        log::info!("Headless run finished after {} frames", frames);
        Ok(())
    }
}
