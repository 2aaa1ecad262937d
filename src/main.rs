//! Canvas Adventure entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use canvas_adventure::persistence::LocalStorage;
    use canvas_adventure::renderer::{CanvasSurface, Hud};
    use canvas_adventure::{Flow, Game, History};

    /// Game plus the surface it draws on
    struct App {
        game: Game<LocalStorage>,
        surface: CanvasSurface,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Canvas Adventure starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let now = js_sys::Date::now();
        let game = Game::new(now as u64, now, LocalStorage);

        let width = game.state.tuning.field_width as u32;
        let height = game.state.tuning.field_height as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        update_history(&game.history);

        let app = Rc::new(RefCell::new(App {
            game,
            surface: CanvasSurface::new(ctx, width, height),
        }));

        setup_input_handlers(app.clone())?;

        request_animation_frame(app);

        log::info!("Canvas Adventure running!");
        Ok(())
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Key down: held keys, fire, revive/restart
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Keep space from scrolling the page
                if key == " " {
                    event.prevent_default();
                }
                let restart = app.borrow_mut().game.key_down(&key);
                if restart {
                    log::info!("Resuming frame loop");
                    request_animation_frame(app.clone());
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: drop held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.blur();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            app.borrow_mut().game.loop_stopped();
            return;
        };
        let frame_app = app.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(frame_app);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(_) => closure.forget(),
            Err(e) => {
                log::error!("requestAnimationFrame failed, frame loop stopped: {:?}", e);
                app.borrow_mut().game.loop_stopped();
            }
        }
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        let outcome = {
            let mut guard = app.borrow_mut();
            let App { game, surface } = &mut *guard;
            game.frame(js_sys::Date::now(), surface)
        };

        update_hud(&outcome.hud);
        if outcome.history_updated {
            update_history(&app.borrow().game.history);
        }

        if outcome.flow == Flow::Continue {
            request_animation_frame(app);
        }
    }

    /// Update HUD element in DOM
    fn update_hud(hud: &Hud) {
        set_inner_html("statusText", &paragraphs(&hud.rows()));
    }

    /// Update history list in DOM
    fn update_history(history: &History) {
        let html = if history.is_empty() {
            format!("<i>{}</i>", canvas_adventure::history::EMPTY_MESSAGE)
        } else {
            paragraphs(&history.lines())
        };
        set_inner_html("historyList", &html);
    }

    fn paragraphs(lines: &[String]) -> String {
        lines
            .iter()
            .map(|line| format!("<p>{}</p>", escape_html(line)))
            .collect()
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn set_inner_html(id: &str, html: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_inner_html(html);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Adventure (native) starting...");
    log::info!("The playable build targets the browser - run with `trunk serve`");

    headless::run(2024, 60 * 120);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot session, used as a native smoke run
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use canvas_adventure::persistence::MemoryStore;
    use canvas_adventure::renderer::Surface;
    use canvas_adventure::{Flow, Game};

    /// Surface that draws nothing
    struct NullSurface;

    impl Surface for NullSurface {
        fn clear(&mut self) {}
        fn set_fill(&mut self, _color: &str) {}
        fn fill_rect(&mut self, _pos: Vec2, _size: Vec2) {}
        fn fill_circle(&mut self, _center: Vec2, _radius: f32) {}
        fn set_font_size(&mut self, _px: f32) {}
        fn measure_text(&self, _text: &str) -> f32 {
            0.0
        }
        fn fill_text(&mut self, _text: &str, _pos: Vec2) {}
    }

    /// Steer toward the nearest coin and fire every few frames
    fn steer<S: canvas_adventure::persistence::KeyValueStore>(game: &mut Game<S>, frame: u64) {
        for key in ["w", "a", "s", "d"] {
            game.key_up(key);
        }

        let player = game.state.player.pos;
        let target = game
            .state
            .coins
            .iter()
            .filter(|c| !c.collected)
            .map(|c| c.pos)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));

        if let Some(target) = target {
            let delta = target - player;
            if delta.x < -2.0 {
                game.key_down("a");
            } else if delta.x > 2.0 {
                game.key_down("d");
            }
            if delta.y < -2.0 {
                game.key_down("w");
            } else if delta.y > 2.0 {
                game.key_down("s");
            }
        }

        if frame % 8 == 0 {
            game.key_down(" ");
            game.key_up(" ");
        }
    }

    pub fn run(seed: u64, max_frames: u64) {
        const FRAME_MS: f64 = 1000.0 / 60.0;

        let mut game = Game::new(seed, 0.0, MemoryStore::new());
        let mut surface = NullSurface;

        for frame in 0..max_frames {
            steer(&mut game, frame);
            let outcome = game.frame(frame as f64 * FRAME_MS, &mut surface);
            if outcome.flow == Flow::Halt {
                log::info!(
                    "Headless run halted after {} frames: {:?}, level {}, score {}",
                    frame + 1,
                    game.state.phase,
                    outcome.hud.level,
                    outcome.hud.score
                );
                return;
            }
        }

        log::info!(
            "Headless run reached the frame limit on level {} with score {}",
            game.state.level,
            game.state.score
        );
    }
}
