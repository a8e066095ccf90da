//! Evil Meter entry point
//!
//! Native builds run a headless autoplay round and print the result. The
//! browser build paints the game onto a 2D canvas.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use evil_meter::audio::WebAudioSink;
    use evil_meter::catalog::{Tier, rating_for};
    use evil_meter::consts::{CARD_HEIGHT, CARD_WIDTH};
    use evil_meter::persistence::LocalStorageStore;
    use evil_meter::render::{DrawCmd, colors, css, tier_accent};
    use evil_meter::share::group_thousands;
    use evil_meter::sim::{FrameRequest, Stage};
    use evil_meter::{AudioHandle, BestScore, Field, Game, Settings};

    /// Browser host around the game
    struct Host {
        game: Game,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        dpr: f64,
        /// Pending clock timeout
        timer: Option<i32>,
        /// Pending animation frame request
        frame_request: Option<i32>,
        /// Long-lived clock and frame callbacks, built once in `run`
        on_clock_fn: Option<js_sys::Function>,
        on_frame_fn: Option<js_sys::Function>,
        /// Kept to await the unlock promise
        audio_ctx: Option<web_sys::AudioContext>,
    }

    type Shared = Rc<RefCell<Host>>;

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    impl Host {
        /// Canvas size in CSS pixels; becomes the field
        fn measure(&mut self) -> Field {
            let w = self.canvas.client_width().max(1);
            let h = self.canvas.client_height().max(1);
            self.canvas.set_width((w as f64 * self.dpr) as u32);
            self.canvas.set_height((h as f64 * self.dpr) as u32);
            Field::new(w as f32, h as f32)
        }

        fn paint(&self) {
            let ctx = &self.ctx;
            let field = self.game.world().field;
            let hud = self.game.hud();

            let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str(&css(colors::BACKGROUND));
            ctx.fill_rect(0.0, 0.0, field.width as f64, field.height as f64);

            ctx.save();
            if hud.shaking {
                let dx = (js_sys::Math::random() - 0.5) * 10.0;
                let dy = (js_sys::Math::random() - 0.5) * 10.0;
                let _ = ctx.translate(dx, dy);
            }

            for cmd in self.game.draw_list() {
                self.paint_cmd(cmd);
            }
            ctx.restore();

            if hud.flashing {
                ctx.set_global_alpha(0.25);
                ctx.set_fill_style_str(&css(colors::GOLD));
                ctx.fill_rect(0.0, 0.0, field.width as f64, field.height as f64);
                ctx.set_global_alpha(1.0);
            }
        }

        fn paint_cmd(&self, cmd: &DrawCmd) {
            let ctx = &self.ctx;
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_global_alpha(1.0);
            match cmd {
                DrawCmd::Card {
                    pos,
                    tilt,
                    label,
                    icon,
                    points,
                    tier,
                } => {
                    let (w, h) = (CARD_WIDTH as f64, CARD_HEIGHT as f64);
                    ctx.save();
                    let _ = ctx.translate(pos.x as f64, pos.y as f64);
                    let _ = ctx.rotate(*tilt as f64);
                    ctx.set_fill_style_str("rgba(20,20,24,0.92)");
                    ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
                    ctx.set_stroke_style_str(&css(tier_accent(*tier)));
                    ctx.set_line_width(if *tier == Tier::Heinous { 3.0 } else { 2.0 });
                    ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
                    ctx.set_font("24px serif");
                    let _ = ctx.fill_text(icon, 0.0, -12.0);
                    ctx.set_fill_style_str(&css(colors::WHITE));
                    ctx.set_font("bold 10px sans-serif");
                    let _ = ctx.fill_text_with_max_width(label, 0.0, 12.0, w - 8.0);
                    ctx.set_fill_style_str(&css(tier_accent(*tier)));
                    let _ = ctx.fill_text(&format!("+{}", points), 0.0, 26.0);
                    ctx.restore();
                }
                DrawCmd::Skull {
                    pos,
                    rotation,
                    scale,
                } => {
                    ctx.save();
                    let _ = ctx.translate(pos.x as f64, pos.y as f64);
                    let _ = ctx.rotate(*rotation as f64);
                    let _ = ctx.scale(*scale as f64, *scale as f64);
                    ctx.set_font("36px serif");
                    let _ = ctx.fill_text("💀", 0.0, 0.0);
                    ctx.restore();
                }
                DrawCmd::Dot {
                    pos,
                    radius,
                    color,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(&css(*color));
                    ctx.begin_path();
                    let _ = ctx.arc(
                        pos.x as f64,
                        pos.y as f64,
                        radius.max(0.0) as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::Icon {
                    pos,
                    icon,
                    size,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_font(&format!("{}px serif", size));
                    let _ = ctx.fill_text(icon, pos.x as f64, pos.y as f64);
                }
                DrawCmd::Text {
                    pos,
                    text,
                    size,
                    color,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_font(&format!("bold {}px sans-serif", size));
                    ctx.set_line_width(4.0);
                    ctx.set_stroke_style_str("black");
                    let _ = ctx.stroke_text(text, pos.x as f64, pos.y as f64);
                    ctx.set_fill_style_str(&css(*color));
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
                DrawCmd::Slingshot { anchor, pouch } => {
                    let fork_l = *anchor + Vec2::new(-22.0, -55.0);
                    let fork_r = *anchor + Vec2::new(22.0, -55.0);
                    ctx.set_stroke_style_str(&css(colors::WOOD));
                    ctx.set_line_width(10.0);
                    ctx.begin_path();
                    ctx.move_to(anchor.x as f64, anchor.y as f64 + 70.0);
                    ctx.line_to(anchor.x as f64, anchor.y as f64);
                    ctx.line_to(fork_l.x as f64, fork_l.y as f64);
                    ctx.move_to(anchor.x as f64, anchor.y as f64);
                    ctx.line_to(fork_r.x as f64, fork_r.y as f64);
                    ctx.stroke();

                    ctx.set_stroke_style_str(&css(colors::CRIMSON));
                    ctx.set_line_width(3.0);
                    ctx.begin_path();
                    ctx.move_to(fork_l.x as f64, fork_l.y as f64);
                    ctx.line_to(pouch.x as f64, pouch.y as f64);
                    ctx.line_to(fork_r.x as f64, fork_r.y as f64);
                    ctx.stroke();
                }
                DrawCmd::AimDot { pos, radius } => {
                    ctx.set_global_alpha(0.6);
                    ctx.set_fill_style_str(&css(colors::WHITE));
                    ctx.begin_path();
                    let _ = ctx.arc(
                        pos.x as f64,
                        pos.y as f64,
                        radius.max(0.5) as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::PowerLabel {
                    pos,
                    percent,
                    color,
                } => {
                    ctx.set_font("bold 14px sans-serif");
                    ctx.set_text_align("left");
                    ctx.set_fill_style_str(&css(*color));
                    let _ = ctx.fill_text(&format!("{}%", percent), pos.x as f64, pos.y as f64);
                }
            }
        }

        /// Mirror the game's HUD into the page
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.game.hud();
            let set = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set("hud-score", &group_thousands(hud.score));
            set("hud-time", &hud.time_left.to_string());
            set("hud-best", &group_thousands(hud.best_score));
            set("hud-evil", &format!("{:.2}%", hud.evil_percent));
            if hud.combo > 1 {
                set("hud-combo", &format!("{}x COMBO (x{:.1})", hud.combo, hud.multiplier));
            } else {
                set("hud-combo", "");
            }
            if let Some(value) = hud.countdown {
                set("countdown", &value.to_string());
            }

            show("landing", hud.stage == Stage::Landing);
            show("countdown", hud.stage == Stage::Countdown);
            show("hud", hud.stage == Stage::Playing);
            show("result", hud.stage == Stage::Result);
            if hud.stage == Stage::Result {
                let rating = rating_for(hud.score);
                set("result-rating", &format!("{} {}", rating.emoji, rating.name));
                set("result-description", rating.description);
                set("share-text", &self.game.summary());
            }
        }
    }

    fn window() -> Option<web_sys::Window> {
        web_sys::window()
    }

    /// Replace any pending clock timeout with one for the current deadline.
    /// Outside the timed stages there is no deadline, so nothing is armed.
    fn reschedule(host: &Shared) {
        let Some(window) = window() else {
            return;
        };
        let deadline = {
            let mut h = host.borrow_mut();
            if let Some(id) = h.timer.take() {
                window.clear_timeout_with_handle(id);
            }
            h.game.next_deadline()
        };
        let Some(deadline) = deadline else {
            return;
        };

        let delay = (deadline - now_ms()).max(0.0).ceil() as i32;
        let mut h = host.borrow_mut();
        let Some(callback) = h.on_clock_fn.clone() else {
            return;
        };
        if let Ok(id) =
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&callback, delay)
        {
            h.timer = Some(id);
        }
    }

    fn on_clock(host: &Shared) {
        {
            let mut h = host.borrow_mut();
            h.timer = None;
            h.game.pump(now_ms());
            h.update_hud();
            if h.game.stage() != Stage::Playing {
                h.cancel_frame();
            }
        }
        arm_frames(host);
        reschedule(host);
    }

    impl Host {
        /// Drop a pending frame request, if any
        fn cancel_frame(&mut self) {
            if let Some(id) = self.frame_request.take() {
                if let Some(window) = window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }

        fn request_frame(&mut self) {
            let (Some(window), Some(callback)) = (window(), self.on_frame_fn.as_ref()) else {
                return;
            };
            self.frame_request = window.request_animation_frame(callback).ok();
        }
    }

    /// Start the frame loop if the game is playing and no frame is pending
    fn arm_frames(host: &Shared) {
        let mut h = host.borrow_mut();
        if h.frame_request.is_some() || h.game.stage() != Stage::Playing {
            return;
        }
        h.request_frame();
    }

    fn game_loop(host: &Shared, time: f64) {
        let mut h = host.borrow_mut();
        h.frame_request = None;
        let request = h.game.frame(time);
        h.paint();
        h.update_hud();
        if request == FrameRequest::Continue {
            h.request_frame();
        }
    }

    /// Build the clock and frame callbacks once; every timeout and frame
    /// request reuses them.
    fn install_callbacks(host: &Shared) {
        let clock_host = host.clone();
        let on_clock_fn: js_sys::Function = Closure::<dyn FnMut()>::new(move || {
            on_clock(&clock_host);
        })
        .into_js_value()
        .unchecked_into();

        let frame_host = host.clone();
        let on_frame_fn: js_sys::Function = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            game_loop(&frame_host, time);
        })
        .into_js_value()
        .unchecked_into();

        let mut h = host.borrow_mut();
        h.on_clock_fn = Some(on_clock_fn);
        h.on_frame_fn = Some(on_frame_fn);
    }

    /// Start or restart a round; kicks off the audio unlock on first use
    fn begin(host: &Shared) {
        let pending = {
            let mut h = host.borrow_mut();
            let now = now_ms();
            let started = match h.game.stage() {
                Stage::Landing => h.game.start(now),
                Stage::Result => h.game.play_again(now),
                _ => false,
            };
            h.update_hud();
            if started && !h.game.is_audio_ready() {
                h.audio_ctx.clone()
            } else {
                None
            }
        };

        if let Some(audio_ctx) = pending {
            let host = host.clone();
            spawn_local(async move {
                if let Ok(promise) = audio_ctx.resume() {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Audio unlock failed: {:?}", e);
                    }
                }
                host.borrow_mut().game.audio_ready(now_ms());
                reschedule(&host);
            });
        }
        reschedule(host);
    }

    fn pointer_down(host: &Shared, pos: Vec2) {
        let stage = host.borrow().game.stage();
        match stage {
            Stage::Landing | Stage::Result => begin(host),
            Stage::Playing => {
                host.borrow_mut().game.press(pos);
            }
            Stage::Countdown => {}
        }
    }

    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.changed_touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            (touch.client_x() as f64 - rect.left()) as f32,
            (touch.client_y() as f64 - rect.top()) as f32,
        ))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Evil Meter starting...");

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
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let sink = WebAudioSink::new();
        let audio_ctx = sink.context();
        let audio = AudioHandle::new(Box::new(sink));
        let best = BestScore::load(Box::new(LocalStorageStore));

        let mut host = Host {
            game: Game::new(Field::default(), settings, audio, best, seed),
            canvas: canvas.clone(),
            ctx,
            dpr: window.device_pixel_ratio(),
            timer: None,
            frame_request: None,
            on_clock_fn: None,
            on_frame_fn: None,
            audio_ctx,
        };
        let field = host.measure();
        host.game.resize(field);
        host.update_hud();
        host.paint();
        let host = Rc::new(RefCell::new(host));
        install_callbacks(&host);

        setup_input_handlers(&canvas, host.clone());
        setup_resize(host.clone());

        log::info!("Evil Meter running (seed {})", seed);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Shared) {
        // Mouse down: start, play again, or grab the pouch
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                pointer_down(&host, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                host.borrow_mut().game.drag_to(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up anywhere in the window ends the drag
        if let Some(window) = window() {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().game.release();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    pointer_down(&host, pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    host.borrow_mut().game.drag_to(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                host.borrow_mut().game.release();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match event.key().as_str() {
                    " " | "Enter" => begin(&host),
                    "m" | "M" => {
                        let mut h = host.borrow_mut();
                        let muted = !h.game.settings().muted;
                        h.game.set_muted(muted);
                        h.game.settings().save();
                        log::info!("Muted: {}", muted);
                    }
                    "c" | "C" => {
                        let h = host.borrow();
                        if h.game.stage() == Stage::Result {
                            log::info!("{}", h.game.summary());
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(host: Shared) {
        let Some(window) = window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut h = host.borrow_mut();
            h.dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let field = h.measure();
            h.game.resize(field);
            h.paint();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use evil_meter::consts::{FRAME_MS, HIT_RADIUS, MIN_LAUNCH_POWER, PROJECTILE_GRAVITY};
    use evil_meter::direction;
    use evil_meter::sim::slingshot::{launch_power, launch_velocity};
    use evil_meter::sim::{Game, Stage, World, within_radius};

    /// Frames between autoplay shots
    const SHOT_COOLDOWN: u32 = 24;
    /// Frames of flight the aim search looks ahead
    const LOOKAHEAD: u32 = 120;

    /// Drag point whose launch is predicted to meet a live target
    fn plan_shot(world: &World) -> Option<Vec2> {
        let anchor = world.slingshot.anchor();
        let origin = world.slingshot.pouch_rest();
        let targets = world.store.targets.as_slice();
        if targets.is_empty() {
            return None;
        }

        for pull in [140.0f32, 120.0, 100.0, 80.0] {
            for step in 0..=24 {
                // Drag down and to the left, from straight down to straight left
                let angle = std::f32::consts::FRAC_PI_2 * (1.0 + step as f32 / 24.0);
                let drag = anchor + direction(angle) * pull;
                let vector = anchor - drag;
                if launch_power(vector) <= MIN_LAUNCH_POWER {
                    continue;
                }

                let mut pos = origin;
                let mut vel = launch_velocity(vector);
                for k in 1..=LOOKAHEAD {
                    pos += vel;
                    vel.y += PROJECTILE_GRAVITY;
                    let hit = targets.iter().any(|t| {
                        let ahead = t.pos + Vec2::new(t.vx * k as f32, 0.0);
                        within_radius(pos, ahead, HIT_RADIUS * 0.6)
                    });
                    if hit {
                        return Some(drag);
                    }
                    if world.field.projectile_escaped(pos) {
                        break;
                    }
                }
            }
        }
        None
    }

    /// Play one full round on a simulated 60 fps clock
    pub fn autoplay(game: &mut Game) {
        let mut now = 0.0;
        let mut cooldown = 0u32;
        game.start(now);

        while game.stage() != Stage::Result {
            now += FRAME_MS;
            game.pump(now);
            if game.stage() != Stage::Playing {
                continue;
            }

            if cooldown == 0 {
                if let Some(drag) = plan_shot(game.world()) {
                    let rest = game.world().slingshot.pouch_rest();
                    game.press(rest);
                    game.drag_to(drag);
                    game.release();
                    cooldown = SHOT_COOLDOWN;
                }
            } else {
                cooldown -= 1;
            }
            game.frame(now);
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
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use evil_meter::audio::{Cue, CueLog};
    use evil_meter::persistence::JsonFileStore;
    use evil_meter::{AudioHandle, BestScore, Field, Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Evil Meter (native) starting...");

    let settings = Settings::load_from(Path::new("settings.json"));
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let cues = CueLog::new();
    let audio = AudioHandle::new(Box::new(cues.clone()));
    let best = BestScore::load(Box::new(JsonFileStore::new("evil_meter_best.json")));
    let mut game = Game::new(Field::default(), settings, audio, best, seed);

    headless::autoplay(&mut game);

    log::info!(
        "{} hits, {} launches, {} misses",
        cues.count(|c| matches!(c, Cue::Hit { .. })),
        cues.count(|c| *c == Cue::Launch),
        cues.count(|c| *c == Cue::Miss)
    );
    println!("{}", game.summary());
    println!("\nBest score: {}", game.best_score());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
