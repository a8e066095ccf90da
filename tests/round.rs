//! End-to-end rounds driven through the public `Game` API

use glam::Vec2;

use evil_meter::audio::{Cue, CueLog};
use evil_meter::consts::FRAME_MS;
use evil_meter::persistence::MemoryStore;
use evil_meter::sim::{FrameRequest, RoundState, Stage};
use evil_meter::{AudioHandle, BestScore, Field, Game, Settings};

struct Rig {
    game: Game,
    cues: CueLog,
    store: MemoryStore,
}

fn rig_with(cues: CueLog, store: MemoryStore, settings: Settings) -> Rig {
    let audio = AudioHandle::new(Box::new(cues.clone()));
    let best = BestScore::load(Box::new(store.clone()));
    let game = Game::new(Field::new(1000.0, 600.0), settings, audio, best, 42);
    Rig { game, cues, store }
}

fn rig() -> Rig {
    rig_with(CueLog::new(), MemoryStore::new(), Settings::default())
}

/// Start a round at t=0 and run the countdown; returns when play began
fn begin_play(game: &mut Game) -> f64 {
    assert!(game.start(0.0));
    game.pump(3000.0);
    assert_eq!(game.stage(), Stage::Playing);
    3000.0
}

/// Drive frames and clock ticks at 60 fps until `until_ms`
fn run_until(game: &mut Game, from_ms: f64, until_ms: f64) -> f64 {
    let mut now = from_ms;
    while now < until_ms {
        now += FRAME_MS;
        game.pump(now);
        game.frame(now);
    }
    now
}

#[test]
fn idle_round_ends_with_zero_score() {
    let mut r = rig();
    let t0 = begin_play(&mut r.game);
    assert_eq!(r.game.time_left(), 40);

    for s in 1..=40 {
        r.game.pump(t0 + s as f64 * 1000.0);
    }

    assert_eq!(r.game.stage(), Stage::Result);
    let round = r.game.round();
    assert_eq!(round.score, 0);
    assert_eq!(round.max_combo, 0);
    assert_eq!(round.accuracy_percent(), 0);
    assert!(r.game.summary().contains("Accuracy: 0%"));
    assert_eq!(r.cues.count(|c| *c == Cue::Victory), 1);
}

#[test]
fn frames_spawn_and_cull_targets_without_growth() {
    let mut r = rig();
    let t0 = begin_play(&mut r.game);
    let end = run_until(&mut r.game, t0, t0 + 30_000.0);
    assert_eq!(r.game.stage(), Stage::Playing);

    // A target crosses 1000px in at most ~420 frames (7 s); with one spawn
    // every 850 ms, at most a handful are alive at once.
    let world = r.game.world();
    assert!(!world.store.targets.is_empty());
    assert!(world.store.targets.len() <= 10);
    assert!(world.store.projectiles.is_empty());
    assert!(world.store.targets.iter().all(|t| t.pos.x >= -100.0));
    assert!(end > t0);
}

#[test]
fn stale_frame_after_round_end_stops() {
    let mut r = rig();
    let t0 = begin_play(&mut r.game);
    assert_eq!(r.game.frame(t0 + 16.0), FrameRequest::Continue);

    let cell = r.game.stage_cell();
    r.game.pump(t0 + 40_000.0);
    assert_eq!(cell.get(), Stage::Result);

    // A frame scheduled before the round ended still runs once, sees the
    // live stage, and refuses to continue
    let before = r.game.world().store.total();
    assert_eq!(r.game.frame(t0 + 40_016.0), FrameRequest::Stop);
    assert_eq!(r.game.world().store.total(), before);
}

#[test]
fn play_again_resets_round_state() {
    let mut r = rig();
    let t0 = begin_play(&mut r.game);
    let rest = r.game.world().slingshot.pouch_rest();
    assert!(r.game.press(rest));
    r.game.drag_to(rest + Vec2::new(-90.0, 90.0));
    assert!(r.game.release());
    let now = run_until(&mut r.game, t0, t0 + 40_500.0);
    assert_eq!(r.game.stage(), Stage::Result);
    assert_eq!(r.game.round().total_shots, 1);

    assert!(r.game.play_again(now));
    assert_eq!(r.game.stage(), Stage::Countdown);
    assert_eq!(r.game.round(), &RoundState::default());
    assert_eq!(r.game.hud().time_left, 40);

    r.game.pump(now + 3000.0);
    assert_eq!(r.game.stage(), Stage::Playing);
    assert_eq!(r.game.world().store.total(), 0);
}

#[test]
fn weak_release_is_ignored() {
    let mut r = rig();
    begin_play(&mut r.game);
    let anchor = r.game.world().slingshot.anchor();
    assert!(r.game.press(r.game.world().slingshot.pouch_rest()));
    r.game.drag_to(anchor + Vec2::new(-10.0, 0.0));
    assert!(!r.game.release());
    assert_eq!(r.game.round().total_shots, 0);
    assert!(r.game.world().store.projectiles.is_empty());
    assert_eq!(r.cues.count(|c| *c == Cue::Launch), 0);
}

#[test]
fn press_far_from_pouch_starts_no_drag() {
    let mut r = rig();
    begin_play(&mut r.game);
    assert!(!r.game.press(Vec2::new(500.0, 100.0)));
    assert!(!r.game.world().slingshot.is_dragging());
}

#[test]
fn deferred_audio_gates_the_countdown() {
    let mut r = rig_with(CueLog::deferred(), MemoryStore::new(), Settings::default());
    assert!(r.game.start(0.0));
    assert!(!r.game.is_audio_ready());
    r.game.pump(5000.0);
    assert_eq!(r.game.stage(), Stage::Countdown);
    assert_eq!(r.game.hud().countdown, Some(3));

    r.game.audio_ready(5000.0);
    r.game.pump(7999.0);
    assert_eq!(r.game.stage(), Stage::Countdown);
    r.game.pump(8000.0);
    assert_eq!(r.game.stage(), Stage::Playing);
    assert_eq!(r.cues.count(|c| *c == Cue::Tick), 3);
}

#[test]
fn best_score_tie_does_not_update() {
    let store = MemoryStore::with_raw("0");
    let mut r = rig_with(CueLog::new(), store, Settings::default());
    let t0 = begin_play(&mut r.game);
    r.game.pump(t0 + 40_000.0);
    assert_eq!(r.game.stage(), Stage::Result);
    assert_eq!(r.game.best_score(), 0);
    assert_eq!(r.store.raw().as_deref(), Some("0"));
}

#[test]
fn corrupt_best_score_reads_as_zero() {
    let r = rig_with(
        CueLog::new(),
        MemoryStore::with_raw("not a number"),
        Settings::default(),
    );
    assert_eq!(r.game.best_score(), 0);
}

#[test]
fn shorter_round_from_settings() {
    let settings = Settings {
        round_seconds: 5,
        countdown_from: 1,
        ..Settings::default()
    };
    let mut r = rig_with(CueLog::new(), MemoryStore::new(), settings);
    assert!(r.game.start(0.0));
    r.game.pump(1000.0);
    assert_eq!(r.game.stage(), Stage::Playing);
    assert_eq!(r.game.time_left(), 5);
    r.game.pump(6000.0);
    assert_eq!(r.game.stage(), Stage::Result);
}

#[test]
fn muted_game_emits_no_cues() {
    let settings = Settings {
        muted: true,
        ..Settings::default()
    };
    let mut r = rig_with(CueLog::new(), MemoryStore::new(), settings);
    let t0 = begin_play(&mut r.game);
    r.game.pump(t0 + 40_000.0);
    assert!(r.cues.cues().is_empty());
}
