//! Ledge Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use ledge_runner::audio::AudioManager;
    use ledge_runner::consts::*;
    use ledge_runner::renderer::{RenderState, build_scene, screen_to_world};
    use ledge_runner::sim::{FrameInput, GamePhase, GameState, tick};
    use ledge_runner::ui::{self, Hud, MenuAction};
    use ledge_runner::{AssetCatalog, Settings, Tuning};

    /// Held movement keys, folded into a `FrameInput` each tick
    #[derive(Default)]
    struct Keys {
        left: bool,
        right: bool,
        down: bool,
        jump: bool,
        dash: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        assets: AssetCatalog,
        audio: AudioManager,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        keys: Keys,
        /// One-shot presses, cleared after the next tick
        pause_pressed: bool,
        restart_pressed: bool,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement) -> Self {
            let settings = Settings::load();
            let state = GameState::new(Tuning::load(), settings.music_enabled);
            let mut audio = AudioManager::for_platform();
            audio.apply_settings(&settings);

            let mut game = Self {
                state,
                assets: AssetCatalog::load(),
                audio,
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                keys: Keys::default(),
                pause_pressed: false,
                restart_pressed: false,
                canvas,
            };
            game.flush_events();
            game
        }

        fn frame_input(&self) -> FrameInput {
            FrameInput {
                left: self.keys.left,
                right: self.keys.right,
                down: self.keys.down,
                jump: self.keys.jump,
                dash: self.keys.dash,
                pause: self.pause_pressed,
                restart: self.restart_pressed,
            }
        }

        fn flush_events(&mut self) {
            let events = self.state.drain_events();
            self.audio.handle_events(&events);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.frame_input();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.pause_pressed = false;
                self.restart_pressed = false;
                self.flush_events();
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, &self.assets);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn click(&mut self, x: f32, y: f32) {
            self.audio.resume();
            let viewport = (
                self.canvas.client_width().max(1) as u32,
                self.canvas.client_height().max(1) as u32,
            );
            let pos = screen_to_world(Vec2::new(x, y), self.state.world_size(), viewport);

            match ui::handle_click(&mut self.state, pos) {
                Some(MenuAction::ToggleSound) => {
                    self.settings.music_enabled = self.state.music_enabled;
                    self.settings.save();
                }
                Some(MenuAction::Quit) => {
                    log::info!("Quit requested");
                    if let Some(window) = web_sys::window() {
                        let _ = window.close();
                    }
                }
                _ => {}
            }
            self.flush_events();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = Hud::from_state(&self.state);

            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_text("#hud-score .hud-value", &hud.score.to_string());
            set_text("#hud-time .hud-value", &format!("{}s", hud.seconds));
            set_text("#hud-dash", &hud.dash_text());
            show("hud-double-jump", hud.double_jump_ready);
            show("hud", hud.phase == GamePhase::Playing);

            show("high-score", hud.phase == GamePhase::Menu && hud.high_score.is_some());
            if let Some(best) = hud.high_score {
                set_text("#high-score .hud-value", &best.to_string());
            }

            show("game-over", hud.phase == GamePhase::GameOver);
            show("win", hud.phase == GamePhase::Win);
            if matches!(hud.phase, GamePhase::GameOver | GamePhase::Win) {
                set_text(".final-score", &hud.score.to_string());
                set_text(".final-time", &format!("{}s", hud.seconds));
            }
            if let Some(left) = hud.win_countdown {
                set_text("#win-countdown", &format!("Back to menu in {left:.1}s..."));
            }
            set_text(
                "#sound-label",
                MenuAction::ToggleSound.label(hud.music_enabled),
            );
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ledge Runner starting...");

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

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new(canvas.clone())));

        // Initialize WebGPU
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

        let world = game.borrow().state.world_size();
        match RenderState::new(surface, &adapter, width, height, world).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {e}"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Ledge Runner running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: held keys plus one-shot presses
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    "ArrowDown" | "s" | "S" => g.keys.down = true,
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        g.keys.jump = true;
                    }
                    "Shift" => g.keys.dash = true,
                    "Escape" | "p" | "P" => {
                        if !event.repeat() {
                            g.pause_pressed = true;
                        }
                    }
                    "r" | "R" => g.restart_pressed = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    "ArrowDown" | "s" | "S" => g.keys.down = false,
                    " " | "ArrowUp" => g.keys.jump = false,
                    "Shift" => g.keys.dash = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click on the canvas: menu buttons
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .click(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase() == GamePhase::Playing {
                    g.state.pause();
                    log::info!("Auto-paused (window blur)");
                }
                // Held keys never see their keyup once focus is gone
                g.keys = Keys::default();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus back: unmute and restart music unless a death or win stopped it
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(false);
                    if g.state.music_wanted() && !g.audio.is_music_playing() {
                        g.audio.handle_event(&ledge_runner::sim::GameEvent::MusicStart);
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
    log::info!("Ledge Runner (native) starting...");
    log::info!("Native mode runs a scripted headless session - use `trunk serve` for the playable web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: start a game, hold right and hop for a while, report.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use ledge_runner::audio::AudioManager;
    use ledge_runner::consts::SIM_DT;
    use ledge_runner::sim::{FrameInput, GamePhase, GameState, tick};
    use ledge_runner::renderer::build_scene;
    use ledge_runner::ui::Hud;
    use ledge_runner::{AssetCatalog, Settings, Tuning};

    const DEMO_FRAMES: u32 = 60 * 20;

    pub fn run() {
        let settings = Settings::load();
        let mut state = GameState::new(Tuning::load(), settings.music_enabled);
        let assets = AssetCatalog::load();
        let mut audio = AudioManager::for_platform();
        audio.apply_settings(&settings);

        state.start();
        for frame in 0..DEMO_FRAMES {
            // Hold right, press jump for 10 frames every second
            let input = FrameInput {
                right: true,
                jump: frame % 60 < 10,
                dash: frame % 120 == 30,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
            audio.handle_events(&state.drain_events());

            if frame % 60 == 0 {
                let hud = Hud::from_state(&state);
                log::info!(
                    "t={}s score={} pos=({:.0}, {:.0}) {}",
                    hud.seconds,
                    hud.score,
                    state.player.pos.x,
                    state.player.pos.y,
                    hud.dash_text()
                );
            }
            if state.phase() != GamePhase::Playing {
                break;
            }
        }

        log::info!("Final frame: {} vertices", build_scene(&state, &assets).len());
        let hud = Hud::from_state(&state);
        println!(
            "Demo finished: phase {:?}, score {}, time {}s, best {}",
            hud.phase,
            hud.score,
            hud.seconds,
            hud.high_score.unwrap_or(0)
        );
    }
}
