//! Room and player state

use serde::{Deserialize, Serialize};

use crate::consts;

/// Match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomMode {
    /// Independent scores, first-archiver speed bonus
    Race,
    /// Shared energy pool and team score
    Coop,
}

/// Room lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomStatus {
    /// Host only, waiting for players
    Waiting,
    /// Enough players to start
    Ready,
    Playing,
    RoundEnd,
    Finished,
}

/// One player's membership in a room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    /// Stable identity from the identity provider
    pub player_id: String,
    pub username: String,
    pub avatar_url: String,
    pub score: i64,
    pub present: bool,
    pub is_host: bool,
    /// Strictly increasing; 0 = host
    pub join_order: u32,
}

/// A multiplayer match container. Owned by the room store; clients only ever
/// see clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// 6-char code from the unambiguous alphabet, stored upper-case
    pub room_code: String,
    pub mode: RoomMode,
    pub status: RoomStatus,
    /// Ordered by join_order; exactly one entry has is_host
    pub players: Vec<PlayerEntry>,
    pub current_round: u32,
    pub max_rounds: u32,
    pub current_content_id: Option<String>,
    /// Coop only
    pub shared_energy: Option<i32>,
    /// Coop only
    pub shared_score: Option<i64>,
    /// Set when a rematch room has been spawned from this one
    pub rematch_room_code: Option<String>,
    pub created_at_ms: f64,
    pub updated_at_ms: f64,
}

impl Room {
    pub fn host(&self) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub(crate) fn player_mut(&mut self, player_id: &str) -> Option<&mut PlayerEntry> {
        self.players.iter_mut().find(|p| p.player_id == player_id)
    }

    pub fn is_member(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= consts::MAX_PLAYERS
    }

    /// True when the match was ended before its final round (abandonment)
    pub fn finished_early(&self) -> bool {
        self.status == RoomStatus::Finished && self.current_round < self.max_rounds
    }

    /// Players currently marked present
    pub fn present_players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.players.iter().filter(|p| p.present)
    }
}
