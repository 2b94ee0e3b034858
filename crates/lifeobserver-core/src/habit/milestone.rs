//! Growth milestones derived from cumulative check-in counts.
//!
//! A fixed ascending threshold table maps a habit's lifetime check-in
//! count to a named level with a progress bar toward the next tier. The
//! final tier has no next threshold and always reports 100% progress.

use serde::Serialize;

/// A milestone tier for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub level: u8,
    pub name: &'static str,
    /// 0..=100 progress toward `next_threshold`.
    pub progress_percent: u8,
    /// Check-in count that unlocks the next tier; `None` on the final
    /// tier (rendered as an infinity marker).
    pub next_threshold: Option<u32>,
    /// Accent color for the habit card.
    pub color: &'static str,
}

struct Tier {
    level: u8,
    name: &'static str,
    min: u32,
    next: Option<u32>,
    color: &'static str,
}

const TIERS: [Tier; 7] = [
    Tier { level: 0, name: "Seed", min: 0, next: Some(10), color: "#CDA283" },
    Tier { level: 1, name: "Sprout", min: 10, next: Some(25), color: "#b3c458" },
    Tier { level: 2, name: "Seedling", min: 25, next: Some(50), color: "#83c769" },
    Tier { level: 3, name: "Sapling", min: 50, next: Some(100), color: "#4b914e" },
    Tier { level: 4, name: "Tree", min: 100, next: Some(200), color: "#357e56" },
    Tier { level: 5, name: "Forest", min: 200, next: Some(500), color: "#24613f" },
    Tier { level: 6, name: "World Tree", min: 500, next: None, color: "#278378" },
];

/// Map a cumulative check-in count to its milestone.
///
/// Total over all counts, deterministic, no side effects.
pub fn milestone_for(check_in_count: u32) -> Milestone {
    let tier = TIERS
        .iter()
        .rev()
        .find(|t| check_in_count >= t.min)
        .unwrap_or(&TIERS[0]);

    let progress_percent = match tier.next {
        Some(next) => {
            let span = (next - tier.min) as f64;
            let into = (check_in_count - tier.min) as f64;
            (into / span * 100.0).round().clamp(0.0, 100.0) as u8
        }
        None => 100,
    };

    Milestone {
        level: tier.level,
        name: tier.name,
        progress_percent,
        next_threshold: tier.next,
        color: tier.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(milestone_for(0).level, 0);
        assert_eq!(milestone_for(9).level, 0);
        assert_eq!(milestone_for(10).level, 1);
        assert_eq!(milestone_for(24).level, 1);
        assert_eq!(milestone_for(25).level, 2);
        assert_eq!(milestone_for(50).level, 3);
        assert_eq!(milestone_for(100).level, 4);
        assert_eq!(milestone_for(200).level, 5);
        assert_eq!(milestone_for(499).level, 5);
        assert_eq!(milestone_for(500).level, 6);
    }

    #[test]
    fn final_tier_is_open_ended() {
        let top = milestone_for(500);
        assert_eq!(top.next_threshold, None);
        assert_eq!(top.progress_percent, 100);
        assert_eq!(milestone_for(100_000).level, 6);
    }

    #[test]
    fn progress_within_band() {
        // Level 0 spans 0..10, so 5 check-ins is halfway.
        assert_eq!(milestone_for(5).progress_percent, 50);
        // Level 1 spans 10..25.
        assert_eq!(milestone_for(10).progress_percent, 0);
        assert_eq!(milestone_for(17).progress_percent, 47);
    }

    proptest! {
        #[test]
        fn level_is_monotone(c1 in 0u32..2000, c2 in 0u32..2000) {
            let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
            prop_assert!(milestone_for(hi).level >= milestone_for(lo).level);
        }

        #[test]
        fn progress_is_bounded(count in 0u32..1_000_000) {
            let m = milestone_for(count);
            prop_assert!(m.progress_percent <= 100);
        }
    }
}
