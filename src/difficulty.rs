//! Level number to gameplay parameter bundle
//!
//! Pure lookup/interpolation. All clients must derive identical round
//! parameters from the same level, so nothing here may depend on ambient
//! state.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::decay::DecayCurve;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Tier {
    /// First level of this tier
    fn first_level(self) -> u32 {
        match self {
            Tier::Easy => 1,
            Tier::Medium => 4,
            Tier::Hard => 7,
            Tier::Expert => 10,
        }
    }

    /// Decay duration at the tier's first level, in seconds
    fn base_duration(self) -> u32 {
        match self {
            Tier::Easy => 60,
            Tier::Medium => 45,
            Tier::Hard => 30,
            Tier::Expert => 18,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
            Tier::Expert => "Expert",
        }
    }
}

/// Everything a round needs, derived from the level number
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyConfig {
    pub tier: Tier,
    pub label: &'static str,
    /// Seconds until full decay
    pub decay_duration: u32,
    /// Seconds of grace before decay begins
    pub decay_start_delay: f32,
    pub decay_curve: DecayCurve,
    /// False sections planted on each page
    pub misinfo_count: u32,
    pub energy_budget: i32,
    pub tool_charges: u32,
}

/// Resolve a level (clamped to [1, MAX_LEVEL]) to its parameter bundle.
pub fn difficulty_for_level(level: u32) -> DifficultyConfig {
    let level = level.clamp(1, consts::MAX_LEVEL);

    let tier = match level {
        1..=3 => Tier::Easy,
        4..=6 => Tier::Medium,
        7..=9 => Tier::Hard,
        _ => Tier::Expert,
    };

    // Within a tier, 3 seconds faster per level past the tier's first level
    let steps = level - tier.first_level();
    let decay_duration = tier
        .base_duration()
        .saturating_sub(steps * 3)
        .max(consts::MIN_DECAY_DURATION_SECS);

    let (decay_start_delay, decay_curve, misinfo_count, tool_charges) = match tier {
        Tier::Easy => (2.0, DecayCurve::Linear, 1, 3),
        Tier::Medium => (1.5, DecayCurve::EaseIn, 2, 2),
        Tier::Hard => (1.0, DecayCurve::EaseInQuad, 3, 2),
        Tier::Expert => (0.5, DecayCurve::EaseInCubic, 3, 1),
    };

    let energy_budget =
        consts::BASE_ARCHIVE_ENERGY + (level / 2) as i32 * consts::ENERGY_PER_LEVEL_PAIR;

    DifficultyConfig {
        tier,
        label: tier.label(),
        decay_duration,
        decay_start_delay,
        decay_curve,
        misinfo_count,
        energy_budget,
        tool_charges,
    }
}
