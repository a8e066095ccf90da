//! Live entities and the world that holds them
//!
//! Each entity kind lives in its own [`Arena`]. The frame step advances an
//! arena in one pass that updates, culls, and draws every entry.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::deck::Deck;
use super::slingshot::Slingshot;
use crate::Field;
use crate::catalog::{TargetSpec, Tier};
use crate::consts::{SHAKE_MS_TIER2, SHAKE_MS_TIER3};
use crate::render::Rgba;

/// A drifting card
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u32,
    pub spec: TargetSpec,
    pub pos: Vec2,
    /// Center line the bob oscillates around
    pub base_y: f32,
    /// Always negative (drifts left)
    pub vx: f32,
    /// Bob/tilt phase, seeded from spawn time
    pub phase: f32,
    /// Cosmetic card rotation
    pub tilt: f32,
}

/// A launched skull
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// What a particle looks like
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleLook {
    Dot(Rgba),
    Icon(&'static str),
}

/// Cosmetic particle (never collides, never scores)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: i32,
    pub look: ParticleLook,
    pub size: f32,
}

/// Floating outlined text
#[derive(Debug, Clone)]
pub struct TextParticle {
    pub pos: Vec2,
    pub text: String,
    pub life: i32,
    pub color: Rgba,
    pub size: f32,
}

/// Storage for one entity kind, in spawn order
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Advance every entry once; entries for which `step` returns false are
    /// dropped. Order of survivors is preserved.
    pub fn advance(&mut self, mut step: impl FnMut(&mut T) -> bool) {
        self.items.retain_mut(|item| step(item));
    }

    /// Remove one entry immediately (collision consumption)
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The four live collections
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub targets: Arena<Target>,
    pub projectiles: Arena<Projectile>,
    pub particles: Arena<Particle>,
    pub texts: Arena<TextParticle>,
}

impl EntityStore {
    pub fn total(&self) -> usize {
        self.targets.len() + self.projectiles.len() + self.particles.len() + self.texts.len()
    }
}

/// Timed screen shake / flash after heavy hits
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenFx {
    shake_until_ms: f64,
    flash_until_ms: f64,
}

impl ScreenFx {
    pub fn trigger(&mut self, tier: Tier, now_ms: f64) {
        match tier {
            Tier::Heinous => {
                self.shake_until_ms = now_ms + SHAKE_MS_TIER3;
                self.flash_until_ms = now_ms + SHAKE_MS_TIER3;
            }
            Tier::Rude => {
                self.shake_until_ms = self.shake_until_ms.max(now_ms + SHAKE_MS_TIER2);
            }
            Tier::Petty => {}
        }
    }

    pub fn shaking(&self, now_ms: f64) -> bool {
        now_ms < self.shake_until_ms
    }

    pub fn flashing(&self, now_ms: f64) -> bool {
        now_ms < self.flash_until_ms
    }
}

/// Everything the frame step mutates
#[derive(Debug, Clone)]
pub struct World {
    pub field: Field,
    pub store: EntityStore,
    pub deck: Deck,
    pub slingshot: Slingshot,
    pub fx: ScreenFx,
    pub rng: Pcg32,
    /// Frame timestamp at which the next target is due; `None` until the
    /// first frame of a round
    pub next_spawn_ms: Option<f64>,
    pub spawn_interval_ms: f64,
    /// Entity ids handed out this round
    next_id: u32,
    /// Timestamp of the most recent frame
    pub now_ms: f64,
}

impl World {
    pub fn new(field: Field, seed: u64, spawn_interval_ms: f64) -> Self {
        Self {
            field,
            store: EntityStore::default(),
            deck: Deck::standard(seed),
            slingshot: Slingshot::new(field.sling_anchor()),
            fx: ScreenFx::default(),
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            next_spawn_ms: None,
            spawn_interval_ms,
            next_id: 1,
            now_ms: 0.0,
        }
    }

    /// Fresh store and spawner for a new round. The old store is dropped,
    /// not emptied and reused.
    pub fn begin_round(&mut self, seed: u64) {
        self.store = EntityStore::default();
        self.deck = Deck::standard(seed);
        self.rng = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
        self.next_spawn_ms = None;
        self.next_id = 1;
        self.fx = ScreenFx::default();
        self.slingshot.cancel();
    }

    /// Field resized by the host; the slingshot follows the new floor
    pub fn resize(&mut self, field: Field) {
        self.field = field;
        self.slingshot.relocate(field.sling_anchor());
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
