//! Client-side round coordination
//!
//! Pure decisions over the latest authoritative snapshot: when a round is
//! complete, when the host safety net should force it, and when an abandoned
//! match may be claimed. Each coordinator instance carries a local one-shot
//! flag, but the store's status preconditions remain the real guard against
//! cross-client races.

use crate::consts;
use crate::model::PageContent;
use crate::room::actions::{self, RoundAction};
use crate::room::types::{Room, RoomMode, RoomStatus};
use crate::scoring;

/// How a round should be ended, with the score deltas to submit
#[derive(Debug, Clone, PartialEq)]
pub struct RoundEndDecision {
    /// Per-player round score additions (absent players contribute 0)
    pub score_deltas: Vec<(String, i64)>,
    /// True when the host grace window forced the end before everyone archived
    pub forced: bool,
}

/// Per-round, per-client coordinator
#[derive(Debug, Clone)]
pub struct RoundCoordinator {
    round: u32,
    local_player_id: String,
    is_host: bool,
    /// Roster present when the round started; completion is judged against
    /// this, not against live presence
    present_at_start: Vec<String>,
    local_archived_at_ms: Option<f64>,
    ended: bool,
}

impl RoundCoordinator {
    /// Capture the round number and the present-at-round-start roster.
    pub fn new(room: &Room, local_player_id: &str) -> Self {
        Self {
            round: room.current_round,
            local_player_id: local_player_id.to_string(),
            is_host: room
                .host()
                .is_some_and(|h| h.player_id == local_player_id),
            present_at_start: room
                .present_players()
                .map(|p| p.player_id.clone())
                .collect(),
            local_archived_at_ms: None,
            ended: false,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn has_archived(&self) -> bool {
        self.local_archived_at_ms.is_some()
    }

    /// Record that this client submitted its archive action.
    pub fn note_local_archived(&mut self, now_ms: f64) {
        if self.local_archived_at_ms.is_none() {
            self.local_archived_at_ms = Some(now_ms);
        }
    }

    /// Decide whether this client should end the round now. Fires at most
    /// once per coordinator; the store's status guard handles the cross-client
    /// race when two clients decide near-simultaneously.
    pub fn decide(&mut self, log: &[RoundAction], now_ms: f64) -> Option<RoundEndDecision> {
        if self.ended {
            return None;
        }

        if actions::round_complete(log, self.round, &self.present_at_start) {
            self.ended = true;
            return Some(RoundEndDecision {
                score_deltas: self.deltas(log),
                forced: false,
            });
        }

        // Host safety net: if stragglers haven't archived within the grace
        // window of the host's own archive, end with whatever scores exist
        if self.is_host
            && let Some(archived_at) = self.local_archived_at_ms
            && now_ms - archived_at >= consts::ROUND_GRACE_MS
        {
            self.ended = true;
            log::debug!("host safety net ending round {}", self.round);
            return Some(RoundEndDecision {
                score_deltas: self.deltas(log),
                forced: true,
            });
        }

        None
    }

    fn deltas(&self, log: &[RoundAction]) -> Vec<(String, i64)> {
        self.present_at_start
            .iter()
            .map(|player_id| {
                (
                    player_id.clone(),
                    actions::archived_score(log, self.round, player_id),
                )
            })
            .collect()
    }
}

/// The round score a race client reports with its archive action: the scored
/// outcome plus the first-archiver speed bonus, floored at zero.
pub fn race_round_score(round_points: i32, first_to_archive: bool) -> i64 {
    let bonus = if first_to_archive {
        consts::RACE_SPEED_BONUS
    } else {
        0
    };
    i64::from(round_points + bonus).max(0)
}

/// Coop team score for a round: every player's selections scored
/// independently (no combo in coop) and summed.
pub fn coop_round_score(
    page: &PageContent,
    selections: &[(String, String)],
    decay_progress: f32,
) -> i64 {
    let mut players: Vec<&str> = selections.iter().map(|(p, _)| p.as_str()).collect();
    players.sort_unstable();
    players.dedup();

    players
        .into_iter()
        .map(|player| {
            let sections: Vec<_> = selections
                .iter()
                .filter(|(p, _)| p == player)
                .filter_map(|(_, section_id)| page.section(section_id))
                .collect();
            i64::from(scoring::score_archive(&sections, decay_progress, 0).round_points)
        })
        .sum()
}

/// Watches for the everyone-else-left condition in race mode. The claim is
/// only suggested after a continuous grace period, and the store re-verifies
/// presence server-side when the claim lands.
#[derive(Debug, Clone, Default)]
pub struct AbandonmentWatch {
    others_absent_since_ms: Option<f64>,
    claimed: bool,
}

impl AbandonmentWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest snapshot. Returns true when the grace period has run
    /// out and the client should submit the claim mutation.
    pub fn observe(&mut self, room: &Room, local_player_id: &str, now_ms: f64) -> bool {
        if self.claimed
            || room.mode != RoomMode::Race
            || !matches!(room.status, RoomStatus::Playing | RoomStatus::RoundEnd)
        {
            return false;
        }
        let self_present = room.player(local_player_id).is_some_and(|p| p.present);
        let others_absent = room
            .players
            .iter()
            .filter(|p| p.player_id != local_player_id)
            .all(|p| !p.present);

        if !self_present || !others_absent {
            // Someone is back; restart the countdown next time
            self.others_absent_since_ms = None;
            return false;
        }

        let since = *self.others_absent_since_ms.get_or_insert(now_ms);
        if now_ms - since >= consts::ABANDON_GRACE_MS {
            self.claimed = true;
            return true;
        }
        false
    }

    /// Seconds left on the countdown, if it is running.
    pub fn remaining_secs(&self, now_ms: f64) -> Option<f32> {
        self.others_absent_since_ms
            .map(|since| (((since + consts::ABANDON_GRACE_MS) - now_ms).max(0.0) / 1000.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerProfile;
    use crate::room::actions::ActionKind;
    use crate::room::store::RoomStore;
    use crate::room::types::RoomMode;

    fn profile(id: &str) -> PlayerProfile {
        PlayerProfile::new(id, format!("user-{id}"))
    }

    fn three_player_room(mode: RoomMode) -> (RoomStore, String) {
        let mut store = RoomStore::new(11);
        let code = store.create_room(&profile("host"), mode, 0.0);
        store.join_room(&code, &profile("p1"), 1.0).unwrap();
        store.join_room(&code, &profile("p2"), 2.0).unwrap();
        store.start_game(&code, "host", "page-1", 3.0).unwrap();
        (store, code)
    }

    fn archive(store: &mut RoomStore, code: &str, player: &str, score: i64, now: f64) {
        store
            .submit_action(code, player, ActionKind::Archive, Some(score.to_string()), now)
            .unwrap();
    }

    #[test]
    fn test_round_ends_when_all_archived() {
        let (mut store, code) = three_player_room(RoomMode::Race);
        let mut coordinator = RoundCoordinator::new(store.room(&code).unwrap(), "host");

        archive(&mut store, &code, "host", 150, 10.0);
        coordinator.note_local_archived(10.0);
        archive(&mut store, &code, "p1", 100, 11.0);
        assert!(coordinator.decide(&store.round_actions(&code, 1), 12.0).is_none());

        archive(&mut store, &code, "p2", 0, 13.0);
        let decision = coordinator
            .decide(&store.round_actions(&code, 1), 14.0)
            .unwrap();
        assert!(!decision.forced);
        let mut deltas = decision.score_deltas.clone();
        deltas.sort();
        assert_eq!(
            deltas,
            vec![
                ("host".to_string(), 150),
                ("p1".to_string(), 100),
                ("p2".to_string(), 0),
            ]
        );

        // One-shot: the same coordinator never fires again
        assert!(coordinator.decide(&store.round_actions(&code, 1), 15.0).is_none());
    }

    #[test]
    fn test_absent_player_excluded_from_round() {
        // 3 players, one absent for the whole round
        let (mut store, code) = three_player_room(RoomMode::Race);
        store.set_presence(&code, "p2", false, 4.0);

        // Coordinator built after presence settled: p2 not in the roster
        let mut coordinator = RoundCoordinator::new(store.room(&code).unwrap(), "host");

        archive(&mut store, &code, "host", 200, 10.0);
        coordinator.note_local_archived(10.0);
        archive(&mut store, &code, "p1", 120, 11.0);

        // Both present players archived: completes without the safety net
        let decision = coordinator
            .decide(&store.round_actions(&code, 1), 12.0)
            .unwrap();
        assert!(!decision.forced);
        assert_eq!(decision.score_deltas.len(), 2);
        assert!(!decision.score_deltas.iter().any(|(p, _)| p == "p2"));

        assert!(store.end_round(&code, &decision.score_deltas, None, 13.0).unwrap());
        assert_eq!(store.room(&code).unwrap().player("p2").unwrap().score, 0);
    }

    #[test]
    fn test_safety_net_forces_after_grace() {
        let (mut store, code) = three_player_room(RoomMode::Race);
        let mut coordinator = RoundCoordinator::new(store.room(&code).unwrap(), "host");

        archive(&mut store, &code, "host", 200, 10_000.0);
        coordinator.note_local_archived(10_000.0);

        // Stragglers never archive; nothing fires inside the window
        let log = store.round_actions(&code, 1);
        assert!(coordinator.decide(&log, 15_000.0).is_none());

        let decision = coordinator.decide(&log, 20_000.0).unwrap();
        assert!(decision.forced);
        let host_delta = decision
            .score_deltas
            .iter()
            .find(|(p, _)| p == "host")
            .unwrap()
            .1;
        assert_eq!(host_delta, 200);
        // Missing players contribute zero
        assert!(decision
            .score_deltas
            .iter()
            .filter(|(p, _)| p != "host")
            .all(|(_, d)| *d == 0));
    }

    #[test]
    fn test_non_host_never_forces() {
        let (mut store, code) = three_player_room(RoomMode::Race);
        let mut coordinator = RoundCoordinator::new(store.room(&code).unwrap(), "p1");

        archive(&mut store, &code, "p1", 100, 0.0);
        coordinator.note_local_archived(0.0);
        assert!(coordinator
            .decide(&store.round_actions(&code, 1), 60_000.0)
            .is_none());
    }

    #[test]
    fn test_duplicate_end_round_safe_under_race() {
        // Two clients both observe completion and submit; second is a no-op
        let (mut store, code) = three_player_room(RoomMode::Race);
        let room = store.room(&code).unwrap().clone();
        let mut host_coord = RoundCoordinator::new(&room, "host");
        let mut p1_coord = RoundCoordinator::new(&room, "p1");

        archive(&mut store, &code, "host", 150, 1.0);
        host_coord.note_local_archived(1.0);
        archive(&mut store, &code, "p1", 100, 2.0);
        p1_coord.note_local_archived(2.0);
        archive(&mut store, &code, "p2", 50, 3.0);

        let log = store.round_actions(&code, 1);
        let a = host_coord.decide(&log, 4.0).unwrap();
        let b = p1_coord.decide(&log, 4.0).unwrap();
        assert_eq!(a.score_deltas.len(), b.score_deltas.len());

        assert!(store.end_round(&code, &a.score_deltas, None, 5.0).unwrap());
        assert!(!store.end_round(&code, &b.score_deltas, None, 5.1).unwrap());
        assert_eq!(store.room(&code).unwrap().player("host").unwrap().score, 150);
    }

    #[test]
    fn test_race_round_score_floor_and_bonus() {
        assert_eq!(race_round_score(-50, false), 0);
        assert_eq!(race_round_score(-50, true), 0);
        assert_eq!(race_round_score(100, true), 150);
        assert_eq!(race_round_score(100, false), 100);
    }

    #[test]
    fn test_coop_round_score_sums_players() {
        let page = crate::content::fallback_pages().remove(0);
        // d1-s1/s3 true, d1-s2 false
        let selections = vec![
            ("a".to_string(), "d1-s1".to_string()),
            ("a".to_string(), "d1-s3".to_string()),
            ("b".to_string(), "d1-s2".to_string()),
        ];
        // a: 200, b: -150
        assert_eq!(coop_round_score(&page, &selections, 0.0), 50);
    }

    #[test]
    fn test_abandonment_watch_grace_and_reset() {
        let (mut store, code) = three_player_room(RoomMode::Race);
        let mut watch = AbandonmentWatch::new();

        store.set_presence(&code, "p1", false, 0.0);
        // p2 still present: no countdown
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 1_000.0));

        store.set_presence(&code, "p2", false, 2_000.0);
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 2_000.0));
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 8_000.0));

        // p1 pops back in: countdown resets
        store.set_presence(&code, "p1", true, 9_000.0);
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 9_000.0));
        store.set_presence(&code, "p1", false, 10_000.0);
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 10_000.0));

        // Full grace period elapses
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 19_000.0));
        assert!(watch.observe(store.room(&code).unwrap(), "host", 20_000.0));
        // Fires once
        assert!(!watch.observe(store.room(&code).unwrap(), "host", 21_000.0));

        assert!(store.claim_win_by_abandonment(&code, "host", 20_001.0).unwrap());
    }
}
