//! Combo-weighted archive scoring
//!
//! Converts a round's selection set plus ground truth into point deltas. The
//! combo multiplier only ever amplifies correct picks, and the cumulative
//! score is clamped at zero.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::model::PageSection;

/// Verdict for one archived section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutcome {
    pub section_id: String,
    pub was_correct: bool,
    /// Multiplier already applied for correct picks
    pub points: i32,
    pub clutch: bool,
}

/// Result of scoring one archive action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub sections: Vec<SectionOutcome>,
    /// Sum of per-section points (penalties never amplified)
    pub round_points: i32,
    pub all_correct: bool,
    /// Combo after this round
    pub combo: u32,
}

/// Score an archive action.
///
/// Each true section earns CORRECT_ARCHIVE_POINTS, plus CLUTCH_SAVE_BONUS if
/// archived with decay progress at or past the clutch threshold. Each false
/// section costs MISINFO_ARCHIVE_PENALTY. If every pick was true, the combo
/// grows by one; otherwise it resets. The multiplier `max(new_combo, 1)`
/// applies to correct-section points only.
pub fn score_archive(selected: &[&PageSection], decay_progress: f32, combo: u32) -> RoundOutcome {
    let all_correct = !selected.is_empty() && selected.iter().all(|s| s.is_true);
    let new_combo = if all_correct { combo + 1 } else { 0 };
    let multiplier = new_combo.max(1) as i32;

    let mut sections = Vec::with_capacity(selected.len());
    let mut round_points = 0;

    for section in selected {
        let clutch = section.is_true && decay_progress >= consts::CLUTCH_THRESHOLD;
        let points = if section.is_true {
            let base = consts::CORRECT_ARCHIVE_POINTS
                + if clutch { consts::CLUTCH_SAVE_BONUS } else { 0 };
            base * multiplier
        } else {
            consts::MISINFO_ARCHIVE_PENALTY
        };
        round_points += points;
        sections.push(SectionOutcome {
            section_id: section.id.clone(),
            was_correct: section.is_true,
            points,
            clutch,
        });
    }

    RoundOutcome {
        sections,
        round_points,
        all_correct,
        combo: new_combo,
    }
}

/// Outcome when decay completes with nothing selected: flat penalty, combo
/// gone, no per-section verdicts.
pub fn timeout_outcome() -> RoundOutcome {
    RoundOutcome {
        sections: Vec::new(),
        round_points: consts::TIMEOUT_PENALTY,
        all_correct: false,
        combo: 0,
    }
}

/// Fold a round's points into the running total. Cumulative score never goes
/// negative.
pub fn apply_round(total: i64, round_points: i32) -> i64 {
    (total + i64::from(round_points)).max(0)
}
