//! Server-authoritative room store
//!
//! Reference implementation of the room mutation surface. Every mutation
//! validates its precondition against current authoritative state and applies
//! atomically, so retried or duplicate deliveries are no-ops instead of
//! double-counts. Score changes are expressed as status-guarded deltas.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts;
use crate::model::PlayerProfile;
use crate::room::actions::{ActionKind, RoundAction};
use crate::room::types::{PlayerEntry, Room, RoomMode, RoomStatus};

/// Unambiguous room-code alphabet (no 0/O, 1/I)
const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_CODE_LEN: usize = 6;

/// Why a room mutation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,
    #[error("room is full")]
    Full,
    #[error("room is no longer accepting players")]
    NotJoinable,
    #[error("only the host can do that")]
    HostOnly,
    #[error("room is not ready to start")]
    NotReady,
    #[error("not a room participant")]
    NotAMember,
    #[error("game is not finished")]
    NotFinished,
}

/// In-process authoritative store for rooms and their action logs
#[derive(Debug)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
    actions: HashMap<String, Vec<RoundAction>>,
    rng: Pcg32,
}

impl RoomStore {
    /// Seeded so tests (and replays) get reproducible room codes.
    pub fn new(seed: u64) -> Self {
        Self {
            rooms: HashMap::new(),
            actions: HashMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn generate_room_code(&mut self) -> String {
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let i = self.rng.random_range(0..ROOM_CODE_CHARS.len());
                    ROOM_CODE_CHARS[i] as char
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Read-only snapshot lookup. Codes are case-insensitive on input.
    pub fn room(&self, room_code: &str) -> Option<&Room> {
        self.rooms.get(&room_code.to_uppercase())
    }

    fn room_mut(&mut self, room_code: &str) -> Result<&mut Room, RoomError> {
        self.rooms
            .get_mut(&room_code.to_uppercase())
            .ok_or(RoomError::NotFound)
    }

    /// The action log for one round (append order preserved).
    pub fn round_actions(&self, room_code: &str, round: u32) -> Vec<RoundAction> {
        self.actions
            .get(&room_code.to_uppercase())
            .map(|log| {
                log.iter()
                    .filter(|a| a.round == round)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Create a room with the caller as host.
    pub fn create_room(&mut self, host: &PlayerProfile, mode: RoomMode, now_ms: f64) -> String {
        let code = self.generate_room_code();
        let room = Room {
            room_code: code.clone(),
            mode,
            status: RoomStatus::Waiting,
            players: vec![PlayerEntry {
                player_id: host.player_id.clone(),
                username: host.username.clone(),
                avatar_url: host.avatar_url.clone(),
                score: 0,
                present: true,
                is_host: true,
                join_order: 0,
            }],
            current_round: 0,
            max_rounds: consts::MAX_ROUNDS,
            current_content_id: None,
            shared_energy: None,
            shared_score: None,
            rematch_room_code: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        log::info!("room {code} created ({mode:?})");
        self.rooms.insert(code.clone(), room);
        self.actions.insert(code.clone(), Vec::new());
        code
    }

    /// Join a room. Idempotent for an existing member; rejected once the room
    /// is full or past the lobby.
    pub fn join_room(
        &mut self,
        room_code: &str,
        profile: &PlayerProfile,
        now_ms: f64,
    ) -> Result<(), RoomError> {
        let room = self.room_mut(room_code)?;

        // Rejoining returns existing membership, not a duplicate
        if room.is_member(&profile.player_id) {
            return Ok(());
        }
        if !matches!(room.status, RoomStatus::Waiting | RoomStatus::Ready) {
            return Err(RoomError::NotJoinable);
        }
        if room.is_full() {
            return Err(RoomError::Full);
        }

        let join_order = room.players.iter().map(|p| p.join_order).max().unwrap_or(0) + 1;
        room.players.push(PlayerEntry {
            player_id: profile.player_id.clone(),
            username: profile.username.clone(),
            avatar_url: profile.avatar_url.clone(),
            score: 0,
            present: true,
            is_host: false,
            join_order,
        });
        room.status = RoomStatus::Ready;
        room.updated_at_ms = now_ms;
        log::debug!("{} joined room {}", profile.player_id, room.room_code);
        Ok(())
    }

    /// Host starts the match: scores reset, everyone marked present, round 1.
    pub fn start_game(
        &mut self,
        room_code: &str,
        caller_id: &str,
        content_id: &str,
        now_ms: f64,
    ) -> Result<(), RoomError> {
        let room = self.room_mut(room_code)?;
        if room.host().is_none_or(|h| h.player_id != caller_id) {
            return Err(RoomError::HostOnly);
        }
        if room.status != RoomStatus::Ready {
            return Err(RoomError::NotReady);
        }

        for player in &mut room.players {
            player.score = 0;
            player.present = true;
        }
        room.current_round = 1;
        room.current_content_id = Some(content_id.to_string());
        if room.mode == RoomMode::Coop {
            room.shared_energy = Some(consts::COOP_SHARED_ENERGY);
            room.shared_score = Some(0);
        }
        room.status = RoomStatus::Playing;
        room.updated_at_ms = now_ms;
        log::info!("room {} started", room.room_code);
        Ok(())
    }

    /// Append a round action. The log is append-only; duplicate archives are
    /// tolerated by the derivation logic, not prevented here.
    pub fn submit_action(
        &mut self,
        room_code: &str,
        caller_id: &str,
        kind: ActionKind,
        data: Option<String>,
        now_ms: f64,
    ) -> Result<(), RoomError> {
        let code = room_code.to_uppercase();
        let room = self.rooms.get(&code).ok_or(RoomError::NotFound)?;
        if !room.is_member(caller_id) {
            return Err(RoomError::NotAMember);
        }
        let round = room.current_round;
        self.actions.entry(code.clone()).or_default().push(RoundAction {
            room_code: code,
            player_id: caller_id.to_string(),
            round,
            kind,
            data,
            timestamp_ms: now_ms,
        });
        Ok(())
    }

    /// End the current round, adding per-player score deltas. Only applies
    /// while status is still Playing; a racing duplicate call finds RoundEnd
    /// and becomes a no-op. Returns whether the transition applied.
    pub fn end_round(
        &mut self,
        room_code: &str,
        score_deltas: &[(String, i64)],
        shared_delta: Option<i64>,
        now_ms: f64,
    ) -> Result<bool, RoomError> {
        let room = self.room_mut(room_code)?;
        if room.status != RoomStatus::Playing {
            log::debug!(
                "end_round on room {} ignored (status {:?})",
                room.room_code,
                room.status
            );
            return Ok(false);
        }

        for (player_id, delta) in score_deltas {
            if let Some(player) = room.player_mut(player_id) {
                player.score += delta;
            }
        }
        if room.mode == RoomMode::Coop {
            let shared = room.shared_score.unwrap_or(0) + shared_delta.unwrap_or(0);
            room.shared_score = Some(shared.max(0));
        }
        room.status = RoomStatus::RoundEnd;
        room.updated_at_ms = now_ms;
        Ok(true)
    }

    /// Advance past a finished round, or finish the match when the round
    /// quota is exhausted. Only applies from RoundEnd.
    pub fn next_round(
        &mut self,
        room_code: &str,
        content_id: &str,
        now_ms: f64,
    ) -> Result<bool, RoomError> {
        let room = self.room_mut(room_code)?;
        if room.status != RoomStatus::RoundEnd {
            return Ok(false);
        }

        if room.current_round + 1 > room.max_rounds {
            room.status = RoomStatus::Finished;
        } else {
            room.current_round += 1;
            room.current_content_id = Some(content_id.to_string());
            if room.mode == RoomMode::Coop {
                room.shared_energy = Some(consts::COOP_SHARED_ENERGY);
            }
            room.status = RoomStatus::Playing;
        }
        room.updated_at_ms = now_ms;
        Ok(true)
    }

    /// Final-round transition to the results screen. No-op unless in RoundEnd.
    pub fn finish_game(&mut self, room_code: &str, now_ms: f64) -> Result<bool, RoomError> {
        let room = self.room_mut(room_code)?;
        if room.status != RoomStatus::RoundEnd {
            return Ok(false);
        }
        for player in &mut room.players {
            player.present = true;
        }
        room.status = RoomStatus::Finished;
        room.updated_at_ms = now_ms;
        Ok(true)
    }

    /// Best-effort presence signal. Frozen once a match ended early so the
    /// post-game default win/lose state stays stable.
    pub fn set_presence(&mut self, room_code: &str, caller_id: &str, present: bool, now_ms: f64) {
        let Ok(room) = self.room_mut(room_code) else {
            return;
        };
        if room.finished_early() {
            return;
        }
        if let Some(player) = room.player_mut(caller_id) {
            player.present = present;
            room.updated_at_ms = now_ms;
        }
    }

    /// Leave the room. Mid-game this only marks the player absent (others keep
    /// playing and may claim an abandonment win); otherwise the room finishes.
    pub fn leave_room(&mut self, room_code: &str, caller_id: &str, now_ms: f64) {
        let Ok(room) = self.room_mut(room_code) else {
            return;
        };
        if !room.is_member(caller_id) {
            return;
        }
        match room.status {
            RoomStatus::Playing | RoomStatus::RoundEnd => {
                if let Some(player) = room.player_mut(caller_id) {
                    player.present = false;
                }
            }
            _ => {
                room.status = RoomStatus::Finished;
            }
        }
        room.updated_at_ms = now_ms;
    }

    /// Race mode: the last present player claims a default win. Re-verifies
    /// all-others-absent against authoritative state at call time, so a stale
    /// client cannot claim after someone reconnected. Returns whether the
    /// match ended.
    pub fn claim_win_by_abandonment(
        &mut self,
        room_code: &str,
        caller_id: &str,
        now_ms: f64,
    ) -> Result<bool, RoomError> {
        let room = self.room_mut(room_code)?;
        if room.mode != RoomMode::Race {
            return Ok(false);
        }
        if !matches!(room.status, RoomStatus::Playing | RoomStatus::RoundEnd) {
            return Ok(false);
        }
        if !room.is_member(caller_id) {
            return Err(RoomError::NotAMember);
        }

        let self_present = room.player(caller_id).is_some_and(|p| p.present);
        let others_absent = room
            .players
            .iter()
            .filter(|p| p.player_id != caller_id)
            .all(|p| !p.present);
        if !self_present || !others_absent {
            return Ok(false);
        }

        room.status = RoomStatus::Finished;
        room.updated_at_ms = now_ms;
        log::info!("room {} ended by abandonment claim", room.room_code);
        Ok(true)
    }

    /// Spawn a fresh room for the same roster: new code, scores zeroed,
    /// everyone present, status Ready. The old room records the pointer.
    pub fn rematch(
        &mut self,
        room_code: &str,
        caller_id: &str,
        now_ms: f64,
    ) -> Result<String, RoomError> {
        let old = self.room_mut(room_code)?;
        if old.status != RoomStatus::Finished {
            return Err(RoomError::NotFinished);
        }
        if !old.is_member(caller_id) {
            return Err(RoomError::NotAMember);
        }

        let mode = old.mode;
        let max_rounds = old.max_rounds;
        let mut players = old.players.clone();
        for player in &mut players {
            player.score = 0;
            player.present = true;
        }
        let old_code = old.room_code.clone();

        let new_code = self.generate_room_code();
        self.rooms.insert(
            new_code.clone(),
            Room {
                room_code: new_code.clone(),
                mode,
                status: RoomStatus::Ready,
                players,
                current_round: 0,
                max_rounds,
                current_content_id: None,
                shared_energy: (mode == RoomMode::Coop).then_some(consts::COOP_SHARED_ENERGY),
                shared_score: (mode == RoomMode::Coop).then_some(0),
                rematch_room_code: None,
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            },
        );
        self.actions.insert(new_code.clone(), Vec::new());

        // Safe: old room was looked up above
        if let Some(old) = self.rooms.get_mut(&old_code) {
            old.rematch_room_code = Some(new_code.clone());
            old.updated_at_ms = now_ms;
        }
        log::info!("room {old_code} rematched into {new_code}");
        Ok(new_code)
    }

    /// Coop: set the shared energy pool after a selection toggle.
    pub fn update_shared_energy(
        &mut self,
        room_code: &str,
        energy: i32,
        now_ms: f64,
    ) -> Result<(), RoomError> {
        let room = self.room_mut(room_code)?;
        if room.mode == RoomMode::Coop {
            room.shared_energy = Some(energy.max(0));
            room.updated_at_ms = now_ms;
        }
        Ok(())
    }
}
