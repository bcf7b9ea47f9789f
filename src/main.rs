//! Flappy Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use flappy_pong::Settings;
    use flappy_pong::ai::predict;
    use flappy_pong::consts::*;
    use flappy_pong::renderer::{
        AssetError, RenderError, SpriteRenderState, Stage, Viewport, create_renderer,
    };
    use flappy_pong::sim::{Event, HUMAN, OPPONENT, WorldState, apply_event, tick};

    /// Anything that stops the game from starting
    #[derive(Debug)]
    enum StartupError {
        Dom(&'static str),
        Assets(AssetError),
        Render(RenderError),
    }

    impl fmt::Display for StartupError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Dom(what) => write!(f, "page setup failed: {}", what),
                Self::Assets(e) => write!(f, "could not load sprites: {}", e),
                Self::Render(e) => write!(f, "WebGPU unavailable: {}", e),
            }
        }
    }

    impl From<AssetError> for StartupError {
        fn from(e: AssetError) -> Self {
            Self::Assets(e)
        }
    }

    impl From<RenderError> for StartupError {
        fn from(e: RenderError) -> Self {
            Self::Render(e)
        }
    }

    /// Game instance holding all state
    struct Game {
        state: WorldState,
        stage: Stage,
        render_state: SpriteRenderState,
        settings: Settings,
        /// Pointer events for the human paddle, applied on the next frame
        pending: Vec<Event>,
        device_pixel_ratio: f32,
        last_time: f64,
        // FPS tracking
        frames_since_report: u32,
        last_report: f64,
    }

    impl Game {
        fn viewport(&self) -> Viewport {
            Viewport::from(self.render_state.size)
        }

        /// Queue a pointer position (CSS pixels relative to the canvas) for the human paddle
        fn pointer_at(&mut self, css_x: f32, css_y: f32) {
            let screen = Vec2::new(css_x, css_y) * self.device_pixel_ratio;
            let world = self.viewport().to_world_position(screen);
            let paddle = &self.state.players[HUMAN];
            self.pending.push(Event::MouseMove {
                x: world.x,
                y: world.y - paddle.height / 2.0,
            });
        }

        /// One animation frame: input, AI, physics, then drawing
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / TICKS_PER_SECOND
            };
            self.last_time = time;
            let delta = (dt * TICKS_PER_SECOND).min(MAX_TICK_DELTA);

            for event in self.pending.drain(..) {
                apply_event(&mut self.state, HUMAN, &event);
            }
            if self.settings.ai_opponent {
                for event in predict(&self.state) {
                    apply_event(&mut self.state, OPPONENT, &event);
                }
            }
            tick(&mut self.state, delta);

            let viewport = self.viewport();
            self.stage.render(delta, &self.state, viewport);
            match self.render_state.render(&self.stage) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

            self.frames_since_report += 1;
            if self.settings.show_fps && time - self.last_report >= 1000.0 {
                let fps = self.frames_since_report as f64 * 1000.0 / (time - self.last_report);
                log::info!("{:.0} fps", fps);
                self.frames_since_report = 0;
                self.last_report = time;
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            if width == 0 || height == 0 {
                return;
            }
            self.render_state.resize(width, height);
            self.stage.resize(Viewport::from((width, height)));
            log::info!("Resized to {}x{}", width, height);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flappy Pong starting...");

        if let Err(e) = start().await {
            log::error!("{}", e);
            if let Some(loading) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("loading"))
            {
                loading.set_text_content(Some(&e.to_string()));
            }
        }
    }

    /// Canvas size in device pixels
    fn canvas_pixel_size(canvas: &HtmlCanvasElement, dpr: f64) -> (u32, u32) {
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width, height)
    }

    async fn start() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::Dom("no window"))?;
        let document = window.document().ok_or(StartupError::Dom("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::Dom("no canvas"))?
            .dyn_into()
            .map_err(|_| StartupError::Dom("#canvas is not a canvas"))?;

        let dpr = window.device_pixel_ratio();
        let (width, height) = canvas_pixel_size(&canvas, dpr);
        canvas.set_width(width);
        canvas.set_height(height);

        // Write back so fields added since the last visit get their defaults stored
        let settings = Settings::load();
        settings.save();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(RenderError::Surface)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(RenderError::Adapter)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let viewport = Viewport::from((width, height));
        let (atlas, stage) = create_renderer(&settings.atlas_manifest, viewport).await?;
        let render_state = SpriteRenderState::new(surface, &adapter, width, height, &atlas).await?;

        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state: WorldState::with_serve_speed(seed, settings.serve_speed),
            stage,
            render_state,
            settings,
            pending: Vec::new(),
            device_pixel_ratio: dpr as f32,
            last_time: 0.0,
            frames_since_report: 0,
            last_report: 0.0,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            if let Err(e) = loading.set_attribute("class", "hidden") {
                log::warn!("Could not hide loading text: {:?}", e);
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(canvas, game.clone());

        request_animation_frame(game);

        log::info!("Flappy Pong running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer_at(event.offset_x() as f32, event.offset_y() as f32);
            });
            listen(canvas, "mousemove", closure);
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer_at(x, y);
                }
            });
            listen(canvas, name, closure);
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let (width, height) = canvas_pixel_size(&canvas, dpr);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.device_pixel_ratio = dpr as f32;
            g.resize(width, height);
        });
        listen(&window, "resize", closure);
    }

    /// Register a listener for the lifetime of the page
    fn listen<T: ?Sized + wasm_bindgen::closure::WasmClosure>(
        target: &web_sys::EventTarget,
        name: &str,
        closure: Closure<T>,
    ) {
        if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed, game loop stopped: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
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
    log::info!("Flappy Pong (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let settings = flappy_pong::Settings::load();
    headless_rally(&settings, 60 * 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one minute of simulated time with a perfect tracker on the left and
/// the predictor on the right
#[cfg(not(target_arch = "wasm32"))]
fn headless_rally(settings: &flappy_pong::Settings, ticks: u32) {
    use flappy_pong::ai::predict;
    use flappy_pong::sim::{Event, HUMAN, OPPONENT, WorldState, apply_event, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    log::info!("Headless rally with seed: {}", seed);

    let mut state = WorldState::with_serve_speed(seed, settings.serve_speed);
    for _ in 0..ticks {
        let target = state.ball.center().y - state.players[HUMAN].height / 2.0;
        apply_event(&mut state, HUMAN, &Event::MouseMove { x: 0.0, y: target });

        if settings.ai_opponent {
            for event in predict(&state) {
                apply_event(&mut state, OPPONENT, &event);
            }
        }
        tick(&mut state, 1.0);
    }

    log::info!(
        "Rally finished after {} ticks: left {} - right {}",
        state.time_ticks,
        state.scores[HUMAN],
        state.scores[OPPONENT]
    );
}
