//! Sky Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use glam::Vec2;
    use sky_dash::EngineConfig;
    use sky_dash::renderer::RenderState;
    use sky_dash::sim::{self, GameMode, GameState};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
    }

    impl Game {
        fn new(config: EngineConfig, viewport: Vec2, seed: u64) -> Self {
            Self {
                state: GameState::new(config, viewport, seed),
                render_state: None,
            }
        }

        /// Exactly one simulation step per display frame
        fn update(&mut self) {
            sim::step(&mut self.state);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let viewport = render_state.viewport;
                        render_state.resize(w, h, viewport);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM; banners are driven purely by mode
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("start-prompt") {
                let class = if self.state.mode == GameMode::NotStarted {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.mode == GameMode::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Canvas size in logical world units and physical pixels
    fn canvas_sizes(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
    ) -> ((f32, f32), (u32, u32)) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let physical = (
            (client_w as f64 * dpr) as u32,
            (client_h as f64 * dpr) as u32,
        );
        ((client_w as f32, client_h as f32), physical)
    }

    /// Load an image and wait for it to decode
    async fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(src);
        JsFuture::from(img.decode()).await?;
        Ok(img)
    }

    /// Pull an image's pixels out through a scratch 2D canvas
    fn image_to_rgba(img: &HtmlImageElement) -> Option<(u32, u32, Vec<u8>)> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let (w, h) = (img.natural_width(), img.natural_height());
        canvas.set_width(w);
        canvas.set_height(h);

        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
        let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64).ok()?;
        Some((w, h, data.data().0))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let ((logical_w, logical_h), (width, height)) = canvas_sizes(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let config = EngineConfig::load();
        let game = Rc::new(RefCell::new(Game::new(
            config,
            Vec2::new(logical_w, logical_h),
            seed,
        )));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
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

        let mut render_state =
            RenderState::new(surface, &adapter, width, height, (logical_w, logical_h)).await;

        // Both sprites must report loaded before the loop may start
        let mut loaded = 0u32;
        let player_img = load_image("player.png")
            .await
            .expect("player image failed to load");
        loaded += 1;
        log::info!("Assets loaded: {}/2", loaded);
        let obstacle_img = load_image("obstacle.png")
            .await
            .expect("obstacle image failed to load");
        loaded += 1;
        log::info!("Assets loaded: {}/2", loaded);

        let (pw, ph, player_rgba) =
            image_to_rgba(&player_img).expect("failed to decode player image");
        let (ow, oh, obstacle_rgba) =
            image_to_rgba(&obstacle_img).expect("failed to decode obstacle image");
        let player_tex = render_state.upload_sprite(pw, ph, &player_rgba, "player_sprite");
        let obstacle_tex = render_state.upload_sprite(ow, oh, &obstacle_rgba, "obstacle_sprite");
        render_state.set_sprites(player_tex, obstacle_tex);

        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Keep the canvas/surface in sync with the window
        setup_resize_handler(game.clone(), canvas.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Sky Dash running!");
    }

    /// Click, touch and space all collapse to the single activate signal,
    /// applied immediately on receipt
    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                sim::activate(&mut game.borrow_mut().state);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                sim::activate(&mut game.borrow_mut().state);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.code() == "Space" {
                    sim::activate(&mut game.borrow_mut().state);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Window resize updates canvas and surface now; the sim picks the new
    /// viewport up at its next reset
    fn setup_resize_handler(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(win) = web_sys::window() else {
                return;
            };
            let ((logical_w, logical_h), (width, height)) = canvas_sizes(&win, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.state.set_viewport(Vec2::new(logical_w, logical_h));
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, (logical_w, logical_h));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            g.update_hud();
        }

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
    log::info!("Sky Dash (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    demo_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless run exercising the engine without a window
#[cfg(not(target_arch = "wasm32"))]
fn demo_run() {
    use sky_dash::sim::{self, GameMode, GameState};

    let config = sky_dash::EngineConfig::load();
    let mut state = GameState::new(config, glam::Vec2::new(960.0, 600.0), 42);

    sim::activate(&mut state);
    let mut ticks = 0u32;
    while state.mode == GameMode::Running && ticks < 36_000 {
        // Naive autopilot: flap whenever descent picks up
        if state.player.velocity > 2.0 {
            sim::activate(&mut state);
        }
        sim::step(&mut state);
        ticks += 1;
    }

    println!(
        "demo run: survived {} ticks, final score {}",
        ticks, state.score
    );
}
