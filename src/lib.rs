//! DUST core - decay/scoring engine and multiplayer round coordination
//!
//! Core modules:
//! - `decay`: Deterministic decay transforms (text, color, layout, image) and
//!   the wall-clock-anchored decay engine
//! - `difficulty`: Level number to gameplay parameter bundle
//! - `scoring`: Combo-weighted archive scoring
//! - `session`: Solo session state machine
//! - `room`: Server-authoritative multiplayer rooms and client coordination
//! - `content` / `leaderboard`: External collaborator contracts with built-in
//!   reference implementations

pub mod content;
pub mod decay;
pub mod difficulty;
pub mod leaderboard;
pub mod model;
pub mod room;
pub mod scoring;
pub mod session;

pub use decay::{DecayCurve, DecayEngine};
pub use session::{GamePhase, Session};

/// Game configuration constants
pub mod consts {
    /// Points for correctly archiving a true section
    pub const CORRECT_ARCHIVE_POINTS: i32 = 100;
    /// Penalty for archiving a misinformation section
    pub const MISINFO_ARCHIVE_PENALTY: i32 = -150;
    /// Bonus for archiving a true section in the last 10% of decay
    pub const CLUTCH_SAVE_BONUS: i32 = 50;
    /// Decay progress at or above which a correct archive counts as clutch
    pub const CLUTCH_THRESHOLD: f32 = 0.9;
    /// Flat penalty when decay completes with nothing selected
    pub const TIMEOUT_PENALTY: i32 = -400;
    /// Race mode: bonus for the first player to archive in a round
    pub const RACE_SPEED_BONUS: i32 = 50;

    /// Base archive energy budget
    pub const BASE_ARCHIVE_ENERGY: i32 = 5;
    /// Extra energy granted per two levels
    pub const ENERGY_PER_LEVEL_PAIR: i32 = 2;
    /// Coop shared energy pool, refilled each round
    pub const COOP_SHARED_ENERGY: i32 = 10;

    /// Never decay faster than this
    pub const MIN_DECAY_DURATION_SECS: u32 = 15;

    /// Highest selectable level
    pub const MAX_LEVEL: u32 = 10;

    /// Pages per solo game
    pub const PAGES_PER_GAME: u32 = 5;
    /// Hard client-side deadline for content loading before fallback kicks in
    pub const CONTENT_LOAD_TIMEOUT_MS: f64 = 5_000.0;

    /// Rounds per multiplayer match
    pub const MAX_ROUNDS: u32 = 5;
    /// Room capacity (host + 4)
    pub const MAX_PLAYERS: usize = 5;
    /// Host safety net: force-end the round this long after the host archived
    pub const ROUND_GRACE_MS: f64 = 10_000.0;
    /// Grace before the last present player may claim a win by abandonment
    pub const ABANDON_GRACE_MS: f64 = 10_000.0;
}

/// Deterministic unit-interval draw from a seed.
///
/// Every pseudo-random decision in the decay transforms flows through this so
/// identical inputs always degrade identically across clients and replays.
#[inline]
pub fn seeded_unit(seed: u64) -> f32 {
    use rand::{Rng, SeedableRng};
    let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
    rng.random::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_unit_deterministic() {
        for seed in [0u64, 1, 42, u64::MAX] {
            assert_eq!(seeded_unit(seed), seeded_unit(seed));
        }
    }

    #[test]
    fn test_seeded_unit_range() {
        for seed in 0..1000u64 {
            let v = seeded_unit(seed);
            assert!((0.0..1.0).contains(&v), "seed {seed} gave {v}");
        }
    }
}
