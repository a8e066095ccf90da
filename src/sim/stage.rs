//! Stage state machine
//!
//! `landing -> countdown -> playing -> result`, with `result -> countdown` on
//! play again. Each timed stage owns its clock inside its [`Phase`] variant, so
//! leaving the stage drops the clock and no stale tick can land in the next
//! one. The public [`Stage`] tag is mirrored into a shared [`StageCell`] that
//! host callbacks read fresh every time they run.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::{FrameRequest, Interval};
use super::scoring::{RoundState, ScoreKeeper, multiplier};
use super::state::World;
use super::tick::{FrameOptions, launch_projectile, step};
use crate::audio::AudioHandle;
use crate::catalog::{evil_percent, panic_level};
use crate::consts::TICK_WARNING_SECONDS;
use crate::highscores::BestScore;
use crate::render::DrawList;
use crate::settings::Settings;
use crate::{Field, share};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Landing,
    Countdown,
    Playing,
    Result,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Landing => "landing",
            Stage::Countdown => "countdown",
            Stage::Playing => "playing",
            Stage::Result => "result",
        }
    }
}

/// Live view of the current stage, shared with host callbacks.
///
/// Clones observe the same value. Only [`Game`] writes it.
#[derive(Debug, Clone, Default)]
pub struct StageCell(Rc<Cell<Stage>>);

impl StageCell {
    pub fn get(&self) -> Stage {
        self.0.get()
    }

    fn set(&self, stage: Stage) {
        self.0.set(stage);
    }
}

/// Stage plus the data only that stage owns
#[derive(Debug, Clone)]
enum Phase {
    Landing,
    /// `clock` stays unarmed until audio is ready
    Countdown { value: u32, clock: Option<Interval> },
    Playing { time_left: u32, clock: Interval },
    Result,
}

impl Phase {
    fn stage(&self) -> Stage {
        match self {
            Phase::Landing => Stage::Landing,
            Phase::Countdown { .. } => Stage::Countdown,
            Phase::Playing { .. } => Stage::Playing,
            Phase::Result => Stage::Result,
        }
    }
}

/// What a clock tick asks the machine to do next
enum ClockAction {
    Tick,
    BeginPlay,
    Finish,
    Nothing,
}

/// Snapshot for a presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub stage: Stage,
    pub score: u64,
    pub combo: u32,
    pub multiplier: f64,
    pub time_left: u32,
    /// Countdown value while counting down
    pub countdown: Option<u32>,
    pub best_score: u64,
    pub panic_level: u8,
    pub evil_percent: f64,
    pub shaking: bool,
    pub flashing: bool,
}

/// The whole game: stage machine, simulation, scoring, and collaborators
#[derive(Debug)]
pub struct Game {
    settings: Settings,
    phase: Phase,
    stage: StageCell,
    world: World,
    scoring: ScoreKeeper,
    audio: AudioHandle,
    best: BestScore,
    draw: DrawList,
    /// Seeds each round's deck and spawner
    rng: Pcg32,
}

impl Game {
    pub fn new(field: Field, settings: Settings, mut audio: AudioHandle, best: BestScore, seed: u64) -> Self {
        audio.set_volume(settings.master_volume);
        audio.set_muted(settings.muted);
        let world = World::new(field, seed, settings.spawn_interval_ms);
        log::info!("Game created (seed {}, best {})", seed, best.get());
        Self {
            settings,
            phase: Phase::Landing,
            stage: StageCell::default(),
            world,
            scoring: ScoreKeeper::new(),
            audio,
            best,
            draw: DrawList::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    /// Shared handle for host callbacks that must see the current stage
    pub fn stage_cell(&self) -> StageCell {
        self.stage.clone()
    }

    pub fn round(&self) -> &RoundState {
        self.scoring.state()
    }

    pub fn best_score(&self) -> u64 {
        self.best.get()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Commands produced by the last frame
    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    pub fn is_audio_ready(&self) -> bool {
        self.audio.is_ready()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.set_muted(muted);
    }

    /// Shareable summary of the current round
    pub fn summary(&self) -> String {
        share::summary(self.scoring.state())
    }

    /// Seconds left in the round
    pub fn time_left(&self) -> u32 {
        match &self.phase {
            Phase::Playing { time_left, .. } => *time_left,
            Phase::Result => 0,
            _ => self.round_seconds(),
        }
    }

    pub fn hud(&self) -> Hud {
        let round = self.scoring.state();
        let now = self.world.now_ms;
        Hud {
            stage: self.phase.stage(),
            score: round.score,
            combo: round.combo,
            multiplier: multiplier(round.combo),
            time_left: self.time_left(),
            countdown: match &self.phase {
                Phase::Countdown { value, .. } => Some(*value),
                _ => None,
            },
            best_score: self.best.get(),
            panic_level: panic_level(round.score),
            evil_percent: evil_percent(round.score),
            shaking: self.world.fx.shaking(now),
            flashing: self.world.fx.flashing(now),
        }
    }

    /// Landing -> countdown. Ignored in any other stage.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !matches!(self.phase, Phase::Landing) {
            log::debug!("start ignored in {}", self.stage().name());
            return false;
        }
        self.begin_countdown(now_ms);
        true
    }

    /// Result -> countdown. Ignored in any other stage.
    pub fn play_again(&mut self, now_ms: f64) -> bool {
        if !matches!(self.phase, Phase::Result) {
            log::debug!("play again ignored in {}", self.stage().name());
            return false;
        }
        self.begin_countdown(now_ms);
        true
    }

    /// The host's asynchronous audio unlock has landed. Arms a countdown
    /// that was waiting on it.
    pub fn audio_ready(&mut self, now_ms: f64) {
        self.audio.mark_ready();
        self.arm_countdown(now_ms);
    }

    /// Host surface changed size. Any drag in progress is dropped.
    pub fn resize(&mut self, field: Field) {
        log::info!("Field resized to {}x{}", field.width, field.height);
        self.world.resize(field);
    }

    /// Deliver every clock tick due at `now_ms`, one at a time. Each tick
    /// re-reads the phase, so a tick that ends a stage stops the rest.
    pub fn pump(&mut self, now_ms: f64) {
        loop {
            let due = match &mut self.phase {
                Phase::Countdown {
                    clock: Some(clock), ..
                } => clock.fire(now_ms),
                Phase::Playing { clock, .. } => clock.fire(now_ms),
                _ => None,
            };
            let Some(due) = due else {
                break;
            };
            self.on_clock_tick(due);
        }
    }

    /// When the active clock next wants to run, if any
    pub fn next_deadline(&self) -> Option<f64> {
        match &self.phase {
            Phase::Countdown {
                clock: Some(clock), ..
            } => Some(clock.next_due()),
            Phase::Playing { clock, .. } => Some(clock.next_due()),
            _ => None,
        }
    }

    /// One animation frame. Reads the live stage; outside `playing` nothing
    /// is simulated and the host must not re-arm.
    pub fn frame(&mut self, now_ms: f64) -> FrameRequest {
        if self.stage.get() != Stage::Playing {
            return FrameRequest::Stop;
        }
        let opts = FrameOptions {
            aim_preview: self.settings.aim_preview,
            screen_fx: !self.settings.reduced_motion,
        };
        step(
            &mut self.world,
            &mut self.scoring,
            &mut self.audio,
            now_ms,
            opts,
            &mut self.draw,
        );
        FrameRequest::Continue
    }

    /// Pointer pressed. Returns whether a drag began.
    pub fn press(&mut self, pos: Vec2) -> bool {
        if self.stage.get() != Stage::Playing {
            return false;
        }
        self.world.slingshot.press(pos)
    }

    pub fn drag_to(&mut self, pos: Vec2) {
        if self.stage.get() != Stage::Playing {
            return;
        }
        self.world.slingshot.drag_to(pos);
    }

    /// Pointer released. Returns whether a projectile was launched.
    pub fn release(&mut self) -> bool {
        if self.stage.get() != Stage::Playing {
            return false;
        }
        let Some(launch) = self.world.slingshot.release() else {
            return false;
        };
        launch_projectile(&mut self.world, launch.origin, launch.velocity);
        self.scoring.on_launch(&mut self.audio);
        log::debug!("launch at {:?}", launch.velocity);
        true
    }

    fn round_seconds(&self) -> u32 {
        self.settings.round_seconds.max(1)
    }

    fn set_phase(&mut self, phase: Phase) {
        let stage = phase.stage();
        self.phase = phase;
        self.stage.set(stage);
        log::info!("Stage -> {}", stage.name());
    }

    fn begin_countdown(&mut self, now_ms: f64) {
        self.scoring.reset();
        self.world.slingshot.cancel();
        let ready = self.audio.prime();
        self.set_phase(Phase::Countdown {
            value: self.settings.countdown_from.max(1),
            clock: None,
        });
        if ready {
            self.arm_countdown(now_ms);
        }
    }

    /// Start the countdown clock if it is waiting; plays the first tick now
    fn arm_countdown(&mut self, now_ms: f64) {
        let Phase::Countdown { clock, .. } = &mut self.phase else {
            return;
        };
        if clock.is_some() {
            return;
        }
        *clock = Some(Interval::seconds(now_ms));
        self.audio.tick();
    }

    fn on_clock_tick(&mut self, due_ms: f64) {
        let action = match &mut self.phase {
            Phase::Countdown { value, .. } => {
                *value = value.saturating_sub(1);
                if *value == 0 {
                    ClockAction::BeginPlay
                } else {
                    ClockAction::Tick
                }
            }
            Phase::Playing { time_left, .. } => {
                if (1..=TICK_WARNING_SECONDS).contains(time_left) {
                    self.audio.tick();
                }
                if *time_left <= 1 {
                    *time_left = 0;
                    ClockAction::Finish
                } else {
                    *time_left -= 1;
                    ClockAction::Nothing
                }
            }
            _ => ClockAction::Nothing,
        };

        match action {
            ClockAction::Tick => self.audio.tick(),
            ClockAction::BeginPlay => self.enter_playing(due_ms),
            ClockAction::Finish => self.finish_round(),
            ClockAction::Nothing => {}
        }
    }

    fn enter_playing(&mut self, at_ms: f64) {
        let seed = self.rng.random::<u64>();
        self.world.spawn_interval_ms = self.settings.spawn_interval_ms;
        self.world.begin_round(seed);
        self.draw.clear();
        self.set_phase(Phase::Playing {
            time_left: self.round_seconds(),
            clock: Interval::seconds(at_ms),
        });
    }

    fn finish_round(&mut self) {
        self.audio.victory();
        self.world.slingshot.cancel();
        let round = self.scoring.state();
        log::info!(
            "Round over: score {}, max combo {}, {} of {} shots",
            round.score,
            round.max_combo,
            round.hits.len(),
            round.total_shots
        );
        let score = round.score;
        self.best.record(score);
        self.set_phase(Phase::Result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueLog};
    use crate::catalog::{TargetSpec, Tier};
    use crate::persistence::MemoryStore;
    use crate::sim::state::Target;

    fn game_with(log: &CueLog, store: &MemoryStore) -> Game {
        let audio = AudioHandle::new(Box::new(log.clone()));
        let best = BestScore::load(Box::new(store.clone()));
        Game::new(Field::new(800.0, 600.0), Settings::default(), audio, best, 7)
    }

    fn game() -> (Game, CueLog) {
        let log = CueLog::new();
        let game = game_with(&log, &MemoryStore::new());
        (game, log)
    }

    /// Run the countdown through to `playing`; returns the time it started
    fn to_playing(game: &mut Game) -> f64 {
        game.start(0.0);
        game.pump(3000.0);
        assert_eq!(game.stage(), Stage::Playing);
        3000.0
    }

    #[test]
    fn test_starts_on_landing() {
        let (game, _log) = game();
        assert_eq!(game.stage(), Stage::Landing);
        assert_eq!(game.next_deadline(), None);
        assert_eq!(game.hud().time_left, 40);
    }

    #[test]
    fn test_countdown_ticks_three_two_one() {
        let (mut game, log) = game();
        assert!(game.start(0.0));
        assert_eq!(game.stage(), Stage::Countdown);
        assert_eq!(game.hud().countdown, Some(3));
        assert_eq!(log.count(|c| *c == Cue::Tick), 1);

        game.pump(1000.0);
        assert_eq!(game.hud().countdown, Some(2));
        game.pump(2000.0);
        assert_eq!(game.hud().countdown, Some(1));
        assert_eq!(log.count(|c| *c == Cue::Tick), 3);

        game.pump(3000.0);
        assert_eq!(game.stage(), Stage::Playing);
        assert_eq!(game.hud().countdown, None);
        assert_eq!(game.time_left(), 40);
        assert_eq!(log.count(|c| *c == Cue::Tick), 3);
    }

    #[test]
    fn test_start_ignored_outside_landing() {
        let (mut game, _log) = game();
        game.start(0.0);
        assert!(!game.start(10.0));
        assert!(!game.play_again(10.0));
        assert_eq!(game.hud().countdown, Some(3));
    }

    #[test]
    fn test_round_timer_ends_round() {
        let (mut game, log) = game();
        let t0 = to_playing(&mut game);
        for s in 1..40 {
            game.pump(t0 + s as f64 * 1000.0);
            assert_eq!(game.stage(), Stage::Playing);
        }
        assert_eq!(game.time_left(), 1);
        game.pump(t0 + 40_000.0);
        assert_eq!(game.stage(), Stage::Result);
        assert_eq!(game.time_left(), 0);
        assert_eq!(game.next_deadline(), None);
        assert_eq!(log.count(|c| *c == Cue::Victory), 1);
        // 3 countdown ticks + warnings at 10..=1 remaining
        assert_eq!(log.count(|c| *c == Cue::Tick), 3 + 10);
    }

    #[test]
    fn test_late_pump_does_not_bleed_into_result() {
        let (mut game, log) = game();
        let t0 = to_playing(&mut game);
        // Host slept well past the end of the round
        game.pump(t0 + 120_000.0);
        assert_eq!(game.stage(), Stage::Result);
        assert_eq!(log.count(|c| *c == Cue::Victory), 1);
        game.pump(t0 + 240_000.0);
        assert_eq!(log.count(|c| *c == Cue::Victory), 1);
    }

    #[test]
    fn test_frame_stops_outside_playing() {
        let (mut game, _log) = game();
        assert_eq!(game.frame(0.0), FrameRequest::Stop);
        let t0 = to_playing(&mut game);
        assert_eq!(game.frame(t0), FrameRequest::Continue);
        assert!(!game.draw_list().is_empty());
        game.pump(t0 + 40_000.0);
        assert_eq!(game.frame(t0 + 40_016.0), FrameRequest::Stop);
    }

    #[test]
    fn test_pointer_ignored_outside_playing() {
        let (mut game, _log) = game();
        let rest = game.world().slingshot.pouch_rest();
        assert!(!game.press(rest));
        assert!(!game.release());
        assert_eq!(game.round().total_shots, 0);
    }

    #[test]
    fn test_release_launches_and_counts_shot() {
        let (mut game, log) = game();
        to_playing(&mut game);
        let rest = game.world().slingshot.pouch_rest();
        assert!(game.press(rest));
        game.drag_to(rest + Vec2::new(-80.0, 80.0));
        assert!(game.release());
        assert_eq!(game.round().total_shots, 1);
        assert_eq!(game.world().store.projectiles.len(), 1);
        assert_eq!(log.count(|c| *c == Cue::Launch), 1);
    }

    #[test]
    fn test_weak_release_is_not_a_shot() {
        let (mut game, log) = game();
        to_playing(&mut game);
        let anchor = game.world().slingshot.anchor();
        assert!(game.press(game.world().slingshot.pouch_rest()));
        game.drag_to(anchor + Vec2::new(-5.0, 5.0));
        assert!(!game.release());
        assert_eq!(game.round().total_shots, 0);
        assert!(!game.world().slingshot.is_dragging());
        assert_eq!(log.count(|c| *c == Cue::Launch), 0);
    }

    #[test]
    fn test_deferred_audio_holds_countdown() {
        let log = CueLog::deferred();
        let mut game = game_with(&log, &MemoryStore::new());
        game.start(0.0);
        assert_eq!(game.stage(), Stage::Countdown);
        assert_eq!(game.next_deadline(), None);
        game.pump(10_000.0);
        assert_eq!(game.hud().countdown, Some(3));
        assert!(log.cues().is_empty());

        game.audio_ready(10_000.0);
        assert_eq!(log.cues(), vec![Cue::Tick]);
        assert_eq!(game.next_deadline(), Some(11_000.0));
        game.pump(13_000.0);
        assert_eq!(game.stage(), Stage::Playing);
    }

    #[test]
    fn test_play_again_resets_round() {
        let (mut game, _log) = game();
        let t0 = to_playing(&mut game);
        let rest = game.world().slingshot.pouch_rest();
        game.press(rest);
        game.drag_to(rest + Vec2::new(-80.0, 80.0));
        game.release();
        game.pump(t0 + 40_000.0);
        assert_eq!(game.round().total_shots, 1);

        assert!(game.play_again(50_000.0));
        assert_eq!(game.stage(), Stage::Countdown);
        assert_eq!(game.round(), &RoundState::default());
        // Entities survive until playing begins, then are discarded
        game.pump(53_000.0);
        assert_eq!(game.world().store.total(), 0);
    }

    #[test]
    fn test_best_score_recorded_at_round_end() {
        let log = CueLog::new();
        let store = MemoryStore::with_raw("50");
        let mut game = game_with(&log, &store);
        assert_eq!(game.best_score(), 50);
        let t0 = to_playing(&mut game);
        game.pump(t0 + 40_000.0);
        // Zero-score round leaves the stored best alone
        assert_eq!(game.best_score(), 50);
        assert_eq!(store.raw().as_deref(), Some("50"));
    }

    #[test]
    fn test_stage_cell_tracks_transitions() {
        let (mut game, _log) = game();
        let cell = game.stage_cell();
        assert_eq!(cell.get(), Stage::Landing);
        to_playing(&mut game);
        assert_eq!(cell.get(), Stage::Playing);
    }

    /// Park a heinous target on the pouch and fire straight into it
    fn land_heinous_hit(game: &mut Game, points: u32, now_ms: f64) {
        let at = game.world().slingshot.pouch_rest();
        let id = game.world.next_entity_id();
        game.world.store.targets.push(Target {
            id,
            spec: TargetSpec {
                label: "test",
                icon: "🎯",
                points,
                tier: Tier::Heinous,
            },
            pos: at,
            base_y: at.y,
            vx: 0.0,
            phase: 0.0,
            tilt: 0.0,
        });
        launch_projectile(&mut game.world, at, Vec2::ZERO);
        assert_eq!(game.frame(now_ms), FrameRequest::Continue);
        assert_eq!(game.round().hits.len(), 1);
    }

    fn game_with_settings(settings: Settings, store: &MemoryStore) -> Game {
        let audio = AudioHandle::new(Box::new(CueLog::new()));
        let best = BestScore::load(Box::new(store.clone()));
        Game::new(Field::new(800.0, 600.0), settings, audio, best, 7)
    }

    #[test]
    fn test_heavy_hit_shakes_unless_reduced_motion() {
        let mut game = game_with_settings(Settings::default(), &MemoryStore::new());
        let t0 = to_playing(&mut game);
        land_heinous_hit(&mut game, 100, t0 + 16.0);
        let hud = game.hud();
        assert!(hud.shaking);
        assert!(hud.flashing);

        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut game = game_with_settings(settings, &MemoryStore::new());
        let t0 = to_playing(&mut game);
        land_heinous_hit(&mut game, 100, t0 + 16.0);
        let hud = game.hud();
        assert!(!hud.shaking);
        assert!(!hud.flashing);
        assert_eq!(hud.score, 100);
    }

    #[test]
    fn test_new_best_saved_at_round_end() {
        let store = MemoryStore::with_raw("100");
        let mut game = game_with_settings(Settings::default(), &store);
        assert_eq!(game.best_score(), 100);
        let t0 = to_playing(&mut game);
        land_heinous_hit(&mut game, 300, t0 + 16.0);
        // Not saved mid-round
        assert_eq!(store.raw().as_deref(), Some("100"));

        game.pump(t0 + 40_000.0);
        assert_eq!(game.stage(), Stage::Result);
        assert_eq!(game.best_score(), 300);
        assert_eq!(game.hud().best_score, 300);
        assert_eq!(store.raw().as_deref(), Some(r#"{"best_score":300}"#));
    }
}
