//! Static game data: the target deck and the rating ladder

/// Target weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Petty,
    Rude,
    Heinous,
}

impl Tier {
    /// 1-based tier number
    pub fn level(self) -> u8 {
        match self {
            Tier::Petty => 1,
            Tier::Rude => 2,
            Tier::Heinous => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Tier::Petty),
            2 => Some(Tier::Rude),
            3 => Some(Tier::Heinous),
            _ => None,
        }
    }

    /// Radial particles emitted when a target of this tier is hit
    pub fn burst_count(self) -> usize {
        match self {
            Tier::Heinous => 16,
            Tier::Petty | Tier::Rude => 10,
        }
    }

    /// Share-strip glyph
    pub fn glyph(self) -> char {
        match self {
            Tier::Heinous => '🟨',
            Tier::Rude => '🟥',
            Tier::Petty => '⬜',
        }
    }
}

/// Immutable target definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    pub label: &'static str,
    pub icon: &'static str,
    pub points: u32,
    pub tier: Tier,
}

const fn entry(label: &'static str, icon: &'static str, points: u32, tier: Tier) -> TargetSpec {
    TargetSpec {
        label,
        icon,
        points,
        tier,
    }
}

use Tier::{Heinous, Petty, Rude};

/// Every target the spawner can deal
pub const CATALOG: [TargetSpec; 59] = [
    // Social media
    entry("Stalked ex at 2am", "🌙", 120, Petty),
    entry("Liked 47-week old pic", "💀", 220, Rude),
    entry("Screenshot to gc", "📸", 160, Rude),
    entry("Posted breakup thirst trap", "🔥", 180, Rude),
    entry("Watched story, no reply", "👁️", 130, Petty),
    entry("Subtweeted someone", "🐦", 110, Petty),
    // Texting
    entry("'OMW' still in bed", "🛏️", 90, Petty),
    entry("'Just saw this' (lying)", "👀", 100, Petty),
    entry("Left on read 3 days", "✓✓", 150, Rude),
    entry("Replied 'K' to essay", "💬", 120, Petty),
    entry("2min voice message", "🎙️", 170, Rude),
    entry("Wrong chat risky text", "😱", 280, Heinous),
    // Food
    entry("Ate LABELED food", "🍕", 200, Rude),
    entry("'One fry' took 15", "🍟", 80, Petty),
    entry("FISH IN MICROWAVE", "🐟", 400, Heinous),
    entry("Finished ice cream secretly", "🍦", 150, Rude),
    entry("'Not hungry' ate half", "😋", 130, Petty),
    entry("Double dipped twice", "🥨", 100, Petty),
    entry("Empty box in cabinet", "📦", 140, Rude),
    entry("Last slice no asking", "🍰", 110, Petty),
    // Work
    entry("Reply-all disaster", "📧", 300, Heinous),
    entry("'Per my last email'", "✍️", 160, Rude),
    entry("Took credit in meeting", "🏆", 350, Heinous),
    entry("4:30pm Friday meeting", "📅", 250, Rude),
    entry("Unmuted while roasting", "🎤", 320, Heinous),
    entry("'Let's circle back' never", "🔄", 90, Petty),
    entry("Blamed wifi for cam off", "📶", 80, Petty),
    // Relationships
    entry("Checked their phone", "📱", 380, Heinous),
    entry("'I'm fine' (not fine)", "🙂", 70, Petty),
    entry("Kept the hoodie", "🧥", 120, Petty),
    entry("Revenge Spotify playlist", "🎵", 190, Rude),
    entry("Ghosted after date 3", "👻", 220, Rude),
    entry("Deleted Netflix profile", "📺", 300, Heinous),
    entry("Weaponized 'whatever'", "💅", 130, Petty),
    entry("Still follows ex's mom", "👀", 160, Rude),
    // Public menace
    entry("Reclined full flight", "✈️", 200, Rude),
    entry("Both armrests taken", "💺", 150, Rude),
    entry("Cart in parking spot", "🛒", 180, Rude),
    entry("Slow walked middle", "🚶", 140, Petty),
    entry("Speakerphone public", "🔈", 210, Rude),
    entry("No wave in traffic", "🚗", 170, Rude),
    entry("Parked over the line", "🅿️", 160, Rude),
    entry("Elevator close spam", "🛗", 100, Petty),
    // Friends
    entry("'Let's hang!' (never)", "🤝", 120, Petty),
    entry("Cancelled last minute", "❌", 150, Rude),
    entry("One-upped their story", "☝️", 130, Petty),
    entry("Pretended not to see", "🙈", 90, Petty),
    entry("Spinach teeth silence", "🥬", 110, Petty),
    // Internet
    entry("SPOILED ENDING", "💀", 450, Heinous),
    entry("Grammar in argument", "🤓", 110, Petty),
    entry("'Well actually' wrong", "🤡", 140, Petty),
    entry("6 streaming passwords", "🔑", 160, Rude),
    entry("47 concert videos", "🎸", 150, Rude),
    entry("Shared without reading", "📰", 90, Petty),
    // Chaotic neutral
    entry("Blamed dog (no dog)", "🐕", 130, Petty),
    entry("'You too' at movies", "🎬", 70, Petty),
    entry("Fake laugh boss joke", "😆", 80, Petty),
    entry("Hotel toiletries hoarded", "🧴", 60, Petty),
    entry("Pocketed work pens", "🖊️", 50, Petty),
];

/// Score at which the evil percentage reads 100%
pub const EVIL_CEILING: u64 = 10_000;

/// One rung of the end-of-round rating ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub name: &'static str,
    pub min_score: u64,
    pub description: &'static str,
    pub emoji: &'static str,
}

/// Ascending by `min_score`; the first rung starts at zero.
pub const RATINGS: [Rating; 9] = [
    Rating {
        name: "GOLDEN RETRIEVER",
        min_score: 0,
        description: "You return shopping carts AND say thank you to Alexa",
        emoji: "🐕",
    },
    Rating {
        name: "YOUR GRANDMA",
        min_score: 500,
        description: "Suspiciously nice. What's behind those cookies?",
        emoji: "👵",
    },
    Rating {
        name: "A SEAGULL",
        min_score: 1200,
        description: "Chaotic fry thief energy",
        emoji: "🦅",
    },
    Rating {
        name: "THAT COWORKER",
        min_score: 2000,
        description: "HR has a whole folder on you",
        emoji: "💼",
    },
    Rating {
        name: "YOUR EX",
        min_score: 3200,
        description: "Emotional damage: DEALT",
        emoji: "💔",
    },
    Rating {
        name: "DMV EMPLOYEE",
        min_score: 4500,
        description: "You enjoy watching people suffer",
        emoji: "🏛️",
    },
    Rating {
        name: "VLAD THE IMPALER",
        min_score: 6000,
        description: "Medieval levels of chaos",
        emoji: "🧛",
    },
    Rating {
        name: "GENGHIS KHAN",
        min_score: 8000,
        description: "You didn't just take the pizza, you conquered the pizzeria",
        emoji: "⚔️",
    },
    Rating {
        name: "LITERALLY SATAN",
        min_score: 10000,
        description: "Even your therapist has a therapist",
        emoji: "😈",
    },
];

/// Highest rung whose threshold the score reaches
pub fn rating_for(score: u64) -> &'static Rating {
    RATINGS
        .iter()
        .rev()
        .find(|r| score >= r.min_score)
        .unwrap_or(&RATINGS[0])
}

/// Avatar expression level (0 = smug .. 4 = panicking)
pub fn panic_level(score: u64) -> u8 {
    match score {
        s if s >= 8000 => 4,
        s if s >= 6000 => 3,
        s if s >= 4000 => 2,
        s if s >= 2000 => 1,
        _ => 0,
    }
}

/// Score as a percentage of [`EVIL_CEILING`] (uncapped)
pub fn evil_percent(score: u64) -> f64 {
    score as f64 / EVIL_CEILING as f64 * 100.0
}
