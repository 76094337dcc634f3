//! Scoring module - round points and combo multipliers
//!
//! A solved round is worth the tier's base points. Once the streak reaches the
//! tier's combo threshold a multiplier applies:
//!
//! | Streak | Multiplier | Effective scaling |
//! |--------|------------|-------------------|
//! | 1-2 | none | 1x |
//! | 3 | 2 | 1x |
//! | 4 | 3 | 1.5x |
//! | 5 | 4 | 2x |
//! | 6+ | 5 | 2.5x |
//!
//! Points are `base * multiplier / 2` in integer arithmetic, truncating toward zero.

use crate::types::{DifficultyTier, MAX_COMBO_MULTIPLIER};

/// Points awarded for one solved round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundScore {
    pub base_points: u32,
    /// Combo multiplier (2..=5), if the streak has reached the threshold.
    pub multiplier: Option<u32>,
    pub total: u32,
}

/// Combo multiplier for `streak`, or `None` below `threshold`.
pub fn combo_multiplier(streak: u32, threshold: u32) -> Option<u32> {
    if streak < threshold {
        return None;
    }
    Some((streak - threshold + 2).min(MAX_COMBO_MULTIPLIER))
}

/// Apply a combo multiplier (in halves) to base points, truncating.
pub fn apply_combo_multiplier(base_points: u32, multiplier: u32) -> u32 {
    base_points.saturating_mul(multiplier) / 2
}

/// Points for a round solved with `streak` consecutive successes (this one included).
pub fn calculate_round_score(tier: DifficultyTier, streak: u32) -> RoundScore {
    let base_points = tier.points_per_round();
    let multiplier = combo_multiplier(streak, tier.combo_threshold());
    let total = match multiplier {
        Some(m) => apply_combo_multiplier(base_points, m),
        None => base_points,
    };

    RoundScore {
        base_points,
        multiplier,
        total,
    }
}
