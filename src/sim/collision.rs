//! Projectile/target collision
//!
//! Circles only: a hit is any center distance under the hit radius, the same
//! for every tier. Targets are scanned in storage order and the first match
//! wins, so a given entity history always resolves the same way.

use glam::Vec2;

use super::state::Target;

/// Strict proximity test between two centers
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Index of the first target within `radius` of `pos`
pub fn first_hit(targets: &[Target], pos: Vec2, radius: f32) -> Option<usize> {
    targets.iter().position(|t| within_radius(pos, t.pos, radius))
}
