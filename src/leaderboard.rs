//! Score store contract
//!
//! The core emits final scores; persistence lives elsewhere. [`ScoreStore`]
//! keeps the best submission per (player, board key), where the key
//! partitions solo boards per level and pools coop globally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Leaderboard partition key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardKey {
    /// Per-level solo board
    Solo(u32),
    /// Single global coop board
    Coop,
}

impl BoardKey {
    pub fn as_str(&self) -> String {
        match self {
            BoardKey::Solo(level) => format!("solo:{level}"),
            BoardKey::Coop => "coop".to_string(),
        }
    }
}

/// One best-score record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_id: String,
    pub username: String,
    pub score: i64,
    /// Percentage
    pub accuracy: u32,
    pub level: u32,
    pub pages_completed: u32,
    /// Unix timestamp (ms) of the submission
    pub timestamp: f64,
}

/// In-memory best-score store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreStore {
    entries: HashMap<String, Vec<ScoreEntry>>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a score. Keeps only the player's best per board; returns true
    /// when the submission became the player's new best.
    pub fn submit(&mut self, key: &BoardKey, entry: ScoreEntry) -> bool {
        let board = self.entries.entry(key.as_str()).or_default();
        match board.iter_mut().find(|e| e.player_id == entry.player_id) {
            Some(existing) => {
                if entry.score > existing.score {
                    log::info!(
                        "new best for {} on {}: {}",
                        entry.player_id,
                        key.as_str(),
                        entry.score
                    );
                    *existing = entry;
                    true
                } else {
                    false
                }
            }
            None => {
                board.push(entry);
                true
            }
        }
    }

    /// Top entries for a board, sorted descending by score (earlier
    /// submission wins ties).
    pub fn top(&self, key: &BoardKey, limit: usize) -> Vec<&ScoreEntry> {
        let mut board: Vec<_> = self
            .entries
            .get(&key.as_str())
            .map(|b| b.iter().collect())
            .unwrap_or_default();
        board.sort_by(|a: &&ScoreEntry, b| {
            b.score
                .cmp(&a.score)
                .then(a.timestamp.total_cmp(&b.timestamp))
        });
        board.truncate(limit);
        board
    }

    /// A player's best on a board, if any.
    pub fn best_for(&self, key: &BoardKey, player_id: &str) -> Option<&ScoreEntry> {
        self.entries
            .get(&key.as_str())
            .and_then(|b| b.iter().find(|e| e.player_id == player_id))
    }
}
