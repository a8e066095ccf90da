//! Per-frame draw commands
//!
//! The frame step appends a command for each entity that survives its update,
//! in update order. A host surface (canvas, terminal, test) paints the list;
//! nothing here knows how.

use glam::Vec2;

use crate::catalog::Tier;

pub type Rgba = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = [0.035, 0.035, 0.043, 1.0];
    pub const GOLD: Rgba = [1.0, 0.843, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.647, 0.0, 1.0];
    pub const EMBER: Rgba = [1.0, 0.42, 0.208, 1.0];
    pub const CRIMSON: Rgba = [0.902, 0.224, 0.275, 1.0];
    pub const SALMON: Rgba = [1.0, 0.42, 0.42, 1.0];
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const GRAY_DARK: Rgba = [0.4, 0.4, 0.4, 1.0];
    pub const GRAY: Rgba = [0.533, 0.533, 0.533, 1.0];
    pub const GRAY_LIGHT: Rgba = [0.667, 0.667, 0.667, 1.0];
    pub const COMBO_GREEN: Rgba = [0.0, 1.0, 0.533, 1.0];
    pub const WOOD: Rgba = [0.545, 0.353, 0.169, 1.0];
    pub const POWER_LOW: Rgba = [0.937, 0.267, 0.267, 1.0];
    pub const POWER_MID: Rgba = [0.918, 0.702, 0.031, 1.0];
    pub const POWER_HIGH: Rgba = [0.133, 0.773, 0.369, 1.0];
}

/// Burst palette for a tier
pub fn burst_palette(tier: Tier) -> [Rgba; 3] {
    match tier {
        Tier::Heinous => [colors::GOLD, colors::ORANGE, colors::EMBER],
        Tier::Rude => [colors::CRIMSON, colors::SALMON, colors::WHITE],
        Tier::Petty => [colors::GRAY_DARK, colors::GRAY, colors::GRAY_LIGHT],
    }
}

/// Accent (border, points text) for a tier
pub fn tier_accent(tier: Tier) -> Rgba {
    match tier {
        Tier::Heinous => colors::GOLD,
        Tier::Rude => colors::CRIMSON,
        Tier::Petty => colors::WHITE,
    }
}

/// CSS color string for canvas hosts
pub fn css(color: Rgba) -> String {
    format!(
        "rgba({},{},{},{})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Target card
    Card {
        pos: Vec2,
        tilt: f32,
        label: &'static str,
        icon: &'static str,
        points: u32,
        tier: Tier,
    },
    /// Skull in flight
    Skull { pos: Vec2, rotation: f32, scale: f32 },
    /// Round particle
    Dot {
        pos: Vec2,
        radius: f32,
        color: Rgba,
        alpha: f32,
    },
    /// Icon particle
    Icon {
        pos: Vec2,
        icon: &'static str,
        size: f32,
        alpha: f32,
    },
    /// Outlined floating text
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Rgba,
        alpha: f32,
    },
    /// Slingshot frame and elastic to the pouch
    Slingshot { anchor: Vec2, pouch: Vec2 },
    /// One dot of the aim preview
    AimDot { pos: Vec2, radius: f32 },
    /// Power readout next to the pulled pouch
    PowerLabel { pos: Vec2, percent: u32, color: Rgba },
}

/// Commands for one frame, in paint order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, keeping the allocation
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd> {
        self.cmds.iter()
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Number of cards drawn this frame
    pub fn cards(&self) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Card { .. }))
            .count()
    }

    /// Number of skulls in flight drawn this frame
    pub fn skulls(&self) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Skull { .. }))
            .count()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCmd;
    type IntoIter = std::slice::Iter<'a, DrawCmd>;

    fn into_iter(self) -> Self::IntoIter {
        self.cmds.iter()
    }
}
