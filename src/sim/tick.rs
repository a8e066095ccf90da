//! Per-frame simulation step
//!
//! Order each frame: spawn, targets, projectiles (with collision), particles,
//! text particles, then the slingshot overlay. Each entity is updated, culled,
//! and drawn in a single pass, so anything removed this frame is never drawn.

use glam::Vec2;
use rand::Rng;

use super::collision::first_hit;
use super::scoring::ScoreKeeper;
use super::state::{Particle, ParticleLook, Projectile, Target, TextParticle, World};
use crate::audio::AudioHandle;
use crate::catalog::TargetSpec;
use crate::consts::*;
use crate::render::{DrawCmd, DrawList, burst_palette, colors, tier_accent};

/// Per-frame options from settings
#[derive(Debug, Clone, Copy)]
pub struct FrameOptions {
    pub aim_preview: bool,
    pub screen_fx: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            aim_preview: true,
            screen_fx: true,
        }
    }
}

/// Advance the world one animation frame at timestamp `now_ms`
pub fn step(
    world: &mut World,
    scoring: &mut ScoreKeeper,
    audio: &mut AudioHandle,
    now_ms: f64,
    opts: FrameOptions,
    draw: &mut DrawList,
) {
    draw.clear();
    world.now_ms = now_ms;

    spawn_due(world, now_ms);

    let World {
        field,
        store,
        slingshot,
        fx,
        rng,
        ..
    } = world;
    let field = *field;

    // Targets
    let bob_t = now_ms / BOB_PERIOD_MS;
    store.targets.advance(|t| {
        t.pos.x += t.vx;
        let wave = (bob_t + f64::from(t.phase)).sin() as f32;
        t.pos.y = t.base_y + wave * BOB_AMPLITUDE;
        t.tilt = wave * TILT_AMPLITUDE;
        if t.pos.x < TARGET_CULL_X {
            return false;
        }
        draw.push(DrawCmd::Card {
            pos: t.pos,
            tilt: t.tilt,
            label: t.spec.label,
            icon: t.spec.icon,
            points: t.spec.points,
            tier: t.spec.tier,
        });
        true
    });

    // Projectiles
    let targets = &mut store.targets;
    let particles = &mut store.particles;
    let texts = &mut store.texts;
    store.projectiles.advance(|p| {
        p.pos += p.vel;
        p.vel.y += PROJECTILE_GRAVITY;
        p.rotation += p.rotation_speed;

        if let Some(idx) = first_hit(targets.as_slice(), p.pos, HIT_RADIUS) {
            let target = targets.remove(idx);
            let outcome = scoring.on_hit(&target.spec, audio);
            burst(&mut *rng, particles, texts, &target, outcome.points, outcome.combo);
            if opts.screen_fx {
                fx.trigger(target.spec.tier, now_ms);
            }
            return false;
        }

        if field.projectile_escaped(p.pos) {
            scoring.on_miss(audio);
            return false;
        }

        draw.push(DrawCmd::Skull {
            pos: p.pos,
            rotation: p.rotation,
            scale: 1.0,
        });
        true
    });

    // Particles
    store.particles.advance(|p| {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= 1;
        if p.life <= 0 {
            return false;
        }
        let alpha = (p.life as f32 / PARTICLE_LIFE as f32).min(1.0);
        draw.push(match p.look {
            ParticleLook::Dot(color) => DrawCmd::Dot {
                pos: p.pos,
                radius: p.size * alpha,
                color,
                alpha,
            },
            ParticleLook::Icon(icon) => DrawCmd::Icon {
                pos: p.pos,
                icon,
                size: p.size,
                alpha,
            },
        });
        true
    });

    // Floating text
    store.texts.advance(|t| {
        t.pos.y -= TEXT_RISE;
        t.life -= 1;
        if t.life <= 0 {
            return false;
        }
        draw.push(DrawCmd::Text {
            pos: t.pos,
            text: t.text.clone(),
            size: t.size,
            color: t.color,
            alpha: (t.life as f32 / 20.0).min(1.0),
        });
        true
    });

    // Slingshot overlay
    draw.push(DrawCmd::Slingshot {
        anchor: slingshot.anchor(),
        pouch: slingshot.pouch(),
    });
    if let Some(aim) = slingshot.aim() {
        if opts.aim_preview {
            for (i, dot) in aim.dots.iter().enumerate() {
                draw.push(DrawCmd::AimDot {
                    pos: *dot,
                    radius: 4.0 - i as f32 * 0.3,
                });
            }
        }
        draw.push(DrawCmd::PowerLabel {
            pos: slingshot.pouch() + Vec2::new(30.0, 0.0),
            percent: aim.percent,
            color: aim.color,
        });
    }
    draw.push(DrawCmd::Skull {
        pos: slingshot.pouch(),
        rotation: 0.0,
        scale: slingshot.pouch_scale(),
    });
}

/// Materialize a target when the spawn deadline has passed
fn spawn_due(world: &mut World, now_ms: f64) {
    let due = world.next_spawn_ms.unwrap_or(now_ms);
    if now_ms < due {
        return;
    }
    let spec = world.deck.next_target();
    spawn_target(world, spec, now_ms);

    // Keep the cadence on the timestamp grid; after a long stall, restart it
    let next = due + world.spawn_interval_ms;
    world.next_spawn_ms = Some(if next <= now_ms {
        now_ms + world.spawn_interval_ms
    } else {
        next
    });
}

/// Place a new target just off the right edge
pub fn spawn_target(world: &mut World, spec: TargetSpec, now_ms: f64) {
    let id = world.next_entity_id();
    let band = world.field.spawn_band();
    let y = TARGET_BAND_TOP + world.rng.random::<f32>() * band;
    let vx = -TARGET_SPEED_MIN - world.rng.random::<f32>() * TARGET_SPEED_SPREAD;
    let phase = ((now_ms / 1000.0) % std::f64::consts::TAU) as f32;
    world.store.targets.push(Target {
        id,
        spec,
        pos: Vec2::new(world.field.width + TARGET_SPAWN_OFFSET, y),
        base_y: y,
        vx,
        phase,
        tilt: 0.0,
    });
}

/// Queue a projectile
pub fn launch_projectile(world: &mut World, origin: Vec2, velocity: Vec2) {
    world.store.projectiles.push(Projectile {
        pos: origin,
        vel: velocity,
        rotation: 0.0,
        rotation_speed: PROJECTILE_SPIN,
    });
}

/// Cosmetic hit burst: radial dots, the target's icon, and floating text
fn burst(
    rng: &mut impl Rng,
    particles: &mut super::state::Arena<Particle>,
    texts: &mut super::state::Arena<TextParticle>,
    target: &Target,
    points: u32,
    combo: u32,
) {
    let tier = target.spec.tier;
    let palette = burst_palette(tier);
    let count = tier.burst_count();
    for j in 0..count {
        let angle = j as f32 / count as f32 * std::f32::consts::TAU;
        let speed = 4.0 + rng.random::<f32>() * 5.0;
        particles.push(Particle {
            pos: target.pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
            life: PARTICLE_LIFE,
            look: ParticleLook::Dot(palette[j % palette.len()]),
            size: 4.0 + rng.random::<f32>() * 4.0,
        });
    }

    particles.push(Particle {
        pos: target.pos,
        vel: Vec2::new(
            (rng.random::<f32>() - 0.5) * 6.0,
            -6.0 - rng.random::<f32>() * 3.0,
        ),
        life: ICON_PARTICLE_LIFE,
        look: ParticleLook::Icon(target.spec.icon),
        size: ICON_PARTICLE_SIZE,
    });

    texts.push(TextParticle {
        pos: target.pos - Vec2::new(0.0, 30.0),
        text: format!("+{}", points),
        life: POINTS_TEXT_LIFE,
        color: tier_accent(tier),
        size: if tier == crate::catalog::Tier::Heinous {
            28.0
        } else {
            22.0
        },
    });

    if combo > 1 {
        texts.push(TextParticle {
            pos: target.pos - Vec2::new(0.0, 55.0),
            text: format!("{}x COMBO!", combo),
            life: COMBO_TEXT_LIFE,
            color: colors::COMBO_GREEN,
            size: 16.0,
        });
    }
}
