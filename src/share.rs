//! Round result export
//!
//! Plain text for a clipboard or a share intent. Pure: same round, same text.

use crate::catalog::{evil_percent, rating_for};
use crate::sim::RoundState;

/// Hits shown in the glyph strip
pub const STRIP_LEN: usize = 10;

/// Digits grouped by thousands: 12345 -> "12,345"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One glyph per hit, by tier, for the first [`STRIP_LEN`] hits
pub fn glyph_strip(round: &RoundState) -> String {
    round
        .hits
        .iter()
        .take(STRIP_LEN)
        .map(|h| h.tier.glyph())
        .collect()
}

/// Multi-line summary of a finished round
pub fn summary(round: &RoundState) -> String {
    let rating = rating_for(round.score);
    let mut lines = vec![
        "🔥 EVIL METER 🔥".to_string(),
        String::new(),
        format!(
            "{} I'm {:.2}% pure evil",
            rating.emoji,
            evil_percent(round.score)
        ),
        format!("Level: {}", rating.name),
        String::new(),
        format!("📊 Score: {}", group_thousands(round.score)),
        format!("🎯 Accuracy: {}%", round.accuracy_percent()),
        format!("⚡ Max Combo: x{}", round.max_combo),
    ];
    let strip = glyph_strip(round);
    if !strip.is_empty() {
        lines.push(String::new());
        lines.push(strip);
    }
    lines.push(String::new());
    lines.push("Think you're worse? 😈".to_string());
    lines.push("#EvilMeter".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tier;
    use crate::sim::HitRecord;

    fn hit(tier: Tier) -> HitRecord {
        HitRecord {
            icon: "🧪",
            points: 100,
            tier,
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_empty_round_summary() {
        let text = summary(&RoundState::default());
        assert!(text.contains("0.00% pure evil"));
        assert!(text.contains("Level: GOLDEN RETRIEVER"));
        assert!(text.contains("Accuracy: 0%"));
        assert!(text.contains("Max Combo: x0"));
        assert!(!text.contains('⬜'));
    }

    #[test]
    fn test_strip_caps_at_ten_hits() {
        let mut round = RoundState::default();
        for i in 0..14 {
            let tier = match i % 3 {
                0 => Tier::Petty,
                1 => Tier::Rude,
                _ => Tier::Heinous,
            };
            round.hits.push(hit(tier));
        }
        let strip = glyph_strip(&round);
        assert_eq!(strip.chars().count(), STRIP_LEN);
        assert!(strip.starts_with("⬜🟥🟨"));
    }

    #[test]
    fn test_summary_reports_round() {
        let round = RoundState {
            score: 6543,
            combo: 0,
            max_combo: 4,
            total_shots: 4,
            hits: vec![hit(Tier::Heinous), hit(Tier::Petty), hit(Tier::Rude)],
        };
        let text = summary(&round);
        assert!(text.contains("65.43% pure evil"));
        assert!(text.contains("Level: VLAD THE IMPALER"));
        assert!(text.contains("Score: 6,543"));
        assert!(text.contains("Accuracy: 75%"));
        assert!(text.contains("Max Combo: x4"));
        assert!(text.contains("🟨⬜🟥"));
    }
}
