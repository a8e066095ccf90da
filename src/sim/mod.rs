//! Simulation core
//!
//! All gameplay logic lives here, free of any platform dependency:
//! - Seeded RNG only (deck, spawner, round seeds)
//! - Stable iteration order (storage order within each arena)
//! - Time comes in as frame timestamps from the host

pub mod clock;
pub mod collision;
pub mod deck;
pub mod scoring;
pub mod slingshot;
pub mod stage;
pub mod state;
pub mod tick;

pub use clock::{FrameRequest, Interval};
pub use collision::{first_hit, within_radius};
pub use deck::Deck;
pub use scoring::{HitOutcome, HitRecord, RoundState, ScoreKeeper, award};
pub use slingshot::{AimPreview, DragState, Launch, Slingshot};
pub use stage::{Game, Hud, Stage, StageCell};
pub use state::{Arena, EntityStore, Particle, ParticleLook, Projectile, Target, TextParticle, World};
pub use tick::{FrameOptions, step};
