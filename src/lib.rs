//! Evil Meter - a timed slingshot arcade game
//!
//! Core modules:
//! - `sim`: Frame simulation (spawning, physics, collisions, scoring, stages)
//! - `catalog`: Static target and rating data
//! - `render`: Per-frame draw commands for whatever surface hosts the game
//! - `audio`: Cue sink with a one-time unlock gate
//! - `persistence`: Best-score storage backends
//! - `share`: End-of-round summary text

pub mod audio;
pub mod catalog;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod render;
pub mod settings;
pub mod share;
pub mod sim;

pub use audio::{AudioHandle, Cue};
pub use error::StoreError;
pub use highscores::BestScore;
pub use settings::Settings;
pub use sim::{Game, Stage};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// Motion is expressed per animation frame (pixels/frame), timing in
/// milliseconds of frame timestamp.
pub mod consts {
    /// Nominal display refresh used by headless drivers
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Spawner cadence
    pub const SPAWN_INTERVAL_MS: f64 = 850.0;
    /// Targets appear this far past the right edge
    pub const TARGET_SPAWN_OFFSET: f32 = 60.0;
    /// Top of the vertical spawn band (below the HUD)
    pub const TARGET_BAND_TOP: f32 = 80.0;
    /// Field height excluded from the spawn band (top + bottom margins)
    pub const TARGET_BAND_MARGIN: f32 = 200.0;
    /// Slowest leftward drift
    pub const TARGET_SPEED_MIN: f32 = 2.8;
    /// Extra drift drawn uniformly on top of the minimum
    pub const TARGET_SPEED_SPREAD: f32 = 1.2;
    /// Targets are culled once their center passes this x
    pub const TARGET_CULL_X: f32 = -100.0;
    /// Vertical bob amplitude (cosmetic)
    pub const BOB_AMPLITUDE: f32 = 6.0;
    /// Bob/tilt phase speed divisor
    pub const BOB_PERIOD_MS: f64 = 300.0;
    /// Card tilt amplitude (radians)
    pub const TILT_AMPLITUDE: f32 = 0.08;
    /// Card size
    pub const CARD_WIDTH: f32 = 100.0;
    pub const CARD_HEIGHT: f32 = 70.0;

    /// Center distance below which a projectile hits a target
    pub const HIT_RADIUS: f32 = 50.0;
    /// Downward acceleration on projectiles
    pub const PROJECTILE_GRAVITY: f32 = 0.4;
    /// Projectile spin per frame
    pub const PROJECTILE_SPIN: f32 = 0.15;
    /// Projectiles survive this far outside the right/left/bottom edges
    pub const PROJECTILE_MARGIN: f32 = 50.0;

    /// Particle physics
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_LIFE: i32 = 40;
    pub const ICON_PARTICLE_LIFE: i32 = 50;
    pub const ICON_PARTICLE_SIZE: f32 = 36.0;
    pub const TEXT_RISE: f32 = 1.5;
    pub const POINTS_TEXT_LIFE: i32 = 50;
    pub const COMBO_TEXT_LIFE: i32 = 40;

    /// Slingshot geometry
    pub const SLING_ANCHOR_X: f32 = 90.0;
    pub const SLING_ANCHOR_FLOOR: f32 = 80.0;
    pub const POUCH_OFFSET: f32 = 60.0;
    pub const CAPTURE_RADIUS: f32 = 70.0;
    pub const MAX_PULL: f32 = 140.0;
    pub const POWER_SCALE: f32 = 0.28;
    /// Releases at or below this power are ignored
    pub const MIN_LAUNCH_POWER: f32 = 5.0;

    /// Round timing
    pub const ROUND_SECONDS: u32 = 40;
    pub const COUNTDOWN_FROM: u32 = 3;
    /// Round clock ticks audibly at or below this many seconds left
    pub const TICK_WARNING_SECONDS: u32 = 10;

    /// Screen effects after heavy hits
    pub const SHAKE_MS_TIER3: f64 = 150.0;
    pub const SHAKE_MS_TIER2: f64 = 80.0;
}

/// Play surface dimensions in local pixel coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Slingshot base for this field size
    pub fn sling_anchor(&self) -> Vec2 {
        Vec2::new(
            consts::SLING_ANCHOR_X,
            self.height - consts::SLING_ANCHOR_FLOOR,
        )
    }

    /// Height of the band targets may spawn in
    pub fn spawn_band(&self) -> f32 {
        (self.height - consts::TARGET_BAND_MARGIN).max(0.0)
    }

    /// True once a projectile has left through the right, left, or bottom edge.
    /// The top is open: gravity always brings a projectile back down.
    pub fn projectile_escaped(&self, pos: Vec2) -> bool {
        let m = consts::PROJECTILE_MARGIN;
        pos.x > self.width + m || pos.x < -m || pos.y > self.height + m
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
