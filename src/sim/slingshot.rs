//! Slingshot input controller
//!
//! One drag session at a time: idle -> dragging -> idle. A press only grabs the
//! pouch when it lands near the pouch's rest point; the pull is clamped to a
//! maximum distance from the anchor, which bounds launch power.

use glam::Vec2;

use crate::consts::{CAPTURE_RADIUS, MAX_PULL, MIN_LAUNCH_POWER, POUCH_OFFSET, POWER_SCALE};
use crate::direction;
use crate::render::{Rgba, colors};

/// Number of dots in the aim preview
pub const PREVIEW_DOTS: usize = 10;
/// Preview velocity multiplier per dot
const PREVIEW_STRIDE: f32 = 3.0;
/// Preview fall per dot
const PREVIEW_FALL: f32 = 1.2;

/// Pointer drag state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub pos: Vec2,
}

/// A qualifying release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub origin: Vec2,
    pub velocity: Vec2,
}

/// Feedback while aiming; never feeds back into the launch itself
#[derive(Debug, Clone, PartialEq)]
pub struct AimPreview {
    pub power: f32,
    /// 0..=100
    pub percent: u32,
    pub color: Rgba,
    pub dots: [Vec2; PREVIEW_DOTS],
}

/// Launch power for a pull vector (anchor minus pulled point)
pub fn launch_power(pull: Vec2) -> f32 {
    pull.length() * POWER_SCALE
}

/// Launch velocity for a pull vector
pub fn launch_velocity(pull: Vec2) -> Vec2 {
    let power = launch_power(pull);
    direction(pull.y.atan2(pull.x)) * power
}

/// Power readout band
pub fn power_color(percent: u32) -> Rgba {
    if percent > 70 {
        colors::POWER_HIGH
    } else if percent > 40 {
        colors::POWER_MID
    } else {
        colors::POWER_LOW
    }
}

#[derive(Debug, Clone)]
pub struct Slingshot {
    anchor: Vec2,
    drag: DragState,
}

impl Slingshot {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            anchor,
            drag: DragState::default(),
        }
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Where the pouch sits when nobody is pulling; launches start here
    pub fn pouch_rest(&self) -> Vec2 {
        self.anchor - Vec2::new(0.0, POUCH_OFFSET)
    }

    /// Where the pouch is drawn this frame
    pub fn pouch(&self) -> Vec2 {
        if self.drag.active {
            self.drag.pos
        } else {
            self.pouch_rest()
        }
    }

    /// Pouch draw scale; grows with the pull
    pub fn pouch_scale(&self) -> f32 {
        if self.drag.active {
            1.0 + self.anchor.distance(self.drag.pos) * 0.002
        } else {
            1.0
        }
    }

    /// Move the slingshot (field resized). Any drag in progress is dropped.
    pub fn relocate(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.drag = DragState::default();
    }

    /// Abandon the current drag without launching
    pub fn cancel(&mut self) {
        self.drag.active = false;
    }

    /// Press at `pos`. Returns whether a drag began.
    pub fn press(&mut self, pos: Vec2) -> bool {
        if pos.distance(self.pouch_rest()) >= CAPTURE_RADIUS {
            return false;
        }
        self.drag = DragState { active: true, pos };
        true
    }

    /// Pointer moved while pressed; no-op when not dragging
    pub fn drag_to(&mut self, pos: Vec2) {
        if !self.drag.active {
            return;
        }
        let offset = pos - self.anchor;
        let dist = offset.length();
        self.drag.pos = if dist > MAX_PULL {
            self.anchor + offset / dist * MAX_PULL
        } else {
            pos
        };
    }

    /// Pointer released. Always ends the drag; yields a launch only when the
    /// pull is strong enough.
    pub fn release(&mut self) -> Option<Launch> {
        if !self.drag.active {
            return None;
        }
        self.drag.active = false;

        let pull = self.anchor - self.drag.pos;
        if launch_power(pull) <= MIN_LAUNCH_POWER {
            return None;
        }
        Some(Launch {
            origin: self.pouch_rest(),
            velocity: launch_velocity(pull),
        })
    }

    /// Power readout and projected path for the current pull
    pub fn aim(&self) -> Option<AimPreview> {
        if !self.drag.active {
            return None;
        }
        let pull = self.anchor - self.drag.pos;
        let power = launch_power(pull);
        let percent = ((power * 3.0).floor() as u32).min(100);

        let mut pos = self.pouch_rest();
        let mut vel = launch_velocity(pull);
        let mut dots = [Vec2::ZERO; PREVIEW_DOTS];
        for dot in dots.iter_mut() {
            pos += vel * PREVIEW_STRIDE;
            vel.y += PREVIEW_FALL;
            *dot = pos;
        }

        Some(AimPreview {
            power,
            percent,
            color: power_color(percent),
            dots,
        })
    }
}
