//! Audio cues
//!
//! The game never talks to a synthesizer directly. It emits [`Cue`]s through an
//! [`AudioHandle`], which stays silent until the backend has been unlocked
//! (browsers only allow audio after a user gesture, and the unlock may finish
//! asynchronously).

use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::Tier;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

/// Sound trigger events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Projectile launched
    Launch,
    /// Target hit; `combo` is the streak capped at 5
    Hit { combo: u32, tier: Tier },
    /// Streak chime for combos above 1
    Combo { level: u32 },
    /// Streak broken
    Miss,
    /// Countdown / last-seconds tick
    Tick,
    /// Round over
    Victory,
}

/// Hit note frequencies (C4 E4 G4 C5 E5 G5), indexed by capped combo
pub const HIT_NOTES: [f32; 6] = [261.63, 329.63, 392.00, 523.25, 659.25, 783.99];

/// Two-note combo chords, indexed by `level - 1` capped at 4
pub const COMBO_CHORDS: [[f32; 2]; 5] = [
    [261.63, 329.63],
    [329.63, 392.00],
    [392.00, 523.25],
    [523.25, 659.25],
    [659.25, 783.99],
];

/// Highest combo level the hit cue distinguishes
pub const MAX_CUE_COMBO: u32 = 5;

pub fn hit_note(combo: u32) -> f32 {
    HIT_NOTES[combo.min(MAX_CUE_COMBO) as usize]
}

pub fn combo_chord(level: u32) -> [f32; 2] {
    COMBO_CHORDS[(level.max(1) - 1).min(4) as usize]
}

/// Result of asking a backend to unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    Ready,
    /// Unlock started; the host calls [`AudioHandle::mark_ready`] when it lands
    Pending,
}

/// Something that can make noise
pub trait AudioSink {
    /// Begin the one-time unlock. Backends that need none are ready at once.
    fn unlock(&mut self) -> Unlock {
        Unlock::Ready
    }

    fn play(&mut self, cue: Cue, volume: f32);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _cue: Cue, _volume: f32) {}
}

/// Sink that records cues into a shared log.
///
/// Clones share the log, so one copy can be boxed into the game while another
/// is inspected by a test or printed by a headless driver.
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    cues: Rc<RefCell<Vec<Cue>>>,
    deferred: bool,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose unlock reports `Pending`, like a browser audio context
    pub fn deferred() -> Self {
        Self {
            cues: Rc::default(),
            deferred: true,
        }
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Cue) -> bool) -> usize {
        self.cues.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.cues.borrow_mut().clear();
    }
}

impl AudioSink for CueLog {
    fn unlock(&mut self) -> Unlock {
        if self.deferred {
            Unlock::Pending
        } else {
            Unlock::Ready
        }
    }

    fn play(&mut self, cue: Cue, _volume: f32) {
        log::debug!("cue {:?}", cue);
        self.cues.borrow_mut().push(cue);
    }
}

/// Gatekeeper between the game and its sink
pub struct AudioHandle {
    sink: Box<dyn AudioSink>,
    ready: bool,
    volume: f32,
    muted: bool,
}

impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("ready", &self.ready)
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl Default for AudioHandle {
    fn default() -> Self {
        Self::new(Box::new(SilentSink))
    }
}

impl AudioHandle {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            ready: false,
            volume: 0.8,
            muted: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Unlock if not already unlocked. Returns true once cues will play.
    pub fn prime(&mut self) -> bool {
        if self.ready {
            return true;
        }
        match self.sink.unlock() {
            Unlock::Ready => {
                self.ready = true;
                log::info!("Audio ready");
            }
            Unlock::Pending => log::info!("Audio unlock pending"),
        }
        self.ready
    }

    /// Called by the host when an asynchronous unlock completes
    pub fn mark_ready(&mut self) {
        if !self.ready {
            log::info!("Audio ready");
        }
        self.ready = true;
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn emit(&mut self, cue: Cue) {
        if !self.ready || self.muted || self.volume <= 0.0 {
            return;
        }
        self.sink.play(cue, self.volume);
    }

    pub fn launch(&mut self) {
        self.emit(Cue::Launch);
    }

    pub fn hit(&mut self, combo: u32, tier: Tier) {
        self.emit(Cue::Hit {
            combo: combo.min(MAX_CUE_COMBO),
            tier,
        });
    }

    pub fn combo(&mut self, level: u32) {
        self.emit(Cue::Combo { level });
    }

    pub fn miss(&mut self) {
        self.emit(Cue::Miss);
    }

    pub fn tick(&mut self) {
        self.emit(Cue::Tick);
    }

    pub fn victory(&mut self) {
        self.emit(Cue::Victory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_until_ready() {
        let log = CueLog::deferred();
        let mut audio = AudioHandle::new(Box::new(log.clone()));
        audio.launch();
        assert!(!audio.prime());
        audio.tick();
        assert!(log.cues().is_empty());

        audio.mark_ready();
        audio.tick();
        assert_eq!(log.cues(), vec![Cue::Tick]);
    }

    #[test]
    fn test_prime_is_idempotent() {
        let log = CueLog::new();
        let mut audio = AudioHandle::new(Box::new(log.clone()));
        assert!(audio.prime());
        assert!(audio.prime());
        audio.miss();
        assert_eq!(log.cues(), vec![Cue::Miss]);
    }

    #[test]
    fn test_hit_combo_is_capped() {
        let log = CueLog::new();
        let mut audio = AudioHandle::new(Box::new(log.clone()));
        audio.prime();
        audio.hit(9, Tier::Rude);
        assert_eq!(
            log.cues(),
            vec![Cue::Hit {
                combo: 5,
                tier: Tier::Rude
            }]
        );
    }

    #[test]
    fn test_muted_drops_cues() {
        let log = CueLog::new();
        let mut audio = AudioHandle::new(Box::new(log.clone()));
        audio.prime();
        audio.set_muted(true);
        audio.victory();
        assert!(log.cues().is_empty());
    }

    #[test]
    fn test_note_tables() {
        assert_eq!(hit_note(0), HIT_NOTES[0]);
        assert_eq!(hit_note(12), HIT_NOTES[5]);
        assert_eq!(combo_chord(2), COMBO_CHORDS[1]);
        assert_eq!(combo_chord(40), COMBO_CHORDS[4]);
        assert_eq!(combo_chord(0), COMBO_CHORDS[0]);
    }
}
