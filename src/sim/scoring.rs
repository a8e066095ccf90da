//! Score, combo streak, and shot accounting
//!
//! [`ScoreKeeper`] is the only writer of [`RoundState`]. Everything else reads
//! snapshots.

use crate::audio::AudioHandle;
use crate::catalog::{TargetSpec, Tier};

/// Multiplier growth per combo step, in tenths
const COMBO_STEP_TENTHS: u64 = 3;

/// One scored hit, as shown in the result strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    pub icon: &'static str,
    pub points: u32,
    pub tier: Tier,
}

/// Round-scoped scoring state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub total_shots: u32,
    pub hits: Vec<HitRecord>,
}

impl RoundState {
    /// Hits per shot as a rounded percentage; 0 when nothing was launched
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_shots == 0 {
            return 0;
        }
        ((self.hits.len() as f64 / self.total_shots as f64) * 100.0).round() as u32
    }
}

/// Points for a hit on a `base`-point target with the streak at `combo`
/// (already counting this hit): `floor(base * (1 + (combo - 1) * 0.3))`.
///
/// Computed in tenths so the floor is exact.
pub fn award(base: u32, combo: u32) -> u32 {
    let steps = u64::from(combo.max(1) - 1);
    let tenths = 10 + steps * COMBO_STEP_TENTHS;
    ((u64::from(base) * tenths) / 10).min(u64::from(u32::MAX)) as u32
}

/// Multiplier shown in the HUD for a given streak
pub fn multiplier(combo: u32) -> f64 {
    1.0 + f64::from(combo.max(1) - 1) * 0.3
}

/// Result of a scored hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub points: u32,
    pub combo: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreKeeper {
    state: RoundState,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Back to a blank round
    pub fn reset(&mut self) {
        self.state = RoundState::default();
    }

    /// Score a hit on `target`
    pub fn on_hit(&mut self, target: &TargetSpec, audio: &mut AudioHandle) -> HitOutcome {
        let s = &mut self.state;
        s.combo += 1;
        let points = award(target.points, s.combo);
        s.score += u64::from(points);
        s.max_combo = s.max_combo.max(s.combo);
        s.hits.push(HitRecord {
            icon: target.icon,
            points,
            tier: target.tier,
        });

        audio.hit(s.combo, target.tier);
        if s.combo > 1 {
            audio.combo(s.combo);
        }
        log::debug!(
            "hit {:?} for {} (combo {})",
            target.label,
            points,
            s.combo
        );

        HitOutcome {
            points,
            combo: s.combo,
        }
    }

    /// A projectile left the field. Breaks the streak; no-op when there is
    /// none. Returns whether a streak was broken.
    pub fn on_miss(&mut self, audio: &mut AudioHandle) -> bool {
        if self.state.combo == 0 {
            return false;
        }
        log::debug!("streak of {} broken", self.state.combo);
        self.state.combo = 0;
        audio.miss();
        true
    }

    /// A projectile was launched
    pub fn on_launch(&mut self, audio: &mut AudioHandle) {
        self.state.total_shots += 1;
        audio.launch();
    }
}
