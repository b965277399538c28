//! Append-only round action log and its pure derivations
//!
//! Nothing in the log is ever mutated or deleted. Mutable-looking state
//! (who has archived, coop selections) is derived by folding over the log, so
//! the derivations are commutative over delivery order and tolerate duplicate
//! submissions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// What a player did during a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Archive,
    UseTools,
    Ping,
    Ready,
    Select,
}

/// One log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundAction {
    pub room_code: String,
    pub player_id: String,
    pub round: u32,
    pub kind: ActionKind,
    /// Kind-specific payload: archive carries the round score, select carries
    /// a JSON `{"sectionId": ...}` object
    pub data: Option<String>,
    pub timestamp_ms: f64,
}

/// Payload of a `Select` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPayload {
    pub section_id: String,
}

/// Players who have submitted an archive action for the round. Set-based, so
/// duplicates and ordering don't matter.
pub fn archived_players<'a>(actions: &'a [RoundAction], round: u32) -> HashSet<&'a str> {
    actions
        .iter()
        .filter(|a| a.round == round && a.kind == ActionKind::Archive)
        .map(|a| a.player_id.as_str())
        .collect()
}

/// The round score a player reported with their archive action. Only the
/// first archive per player counts; later duplicates are ignored.
pub fn archived_score(actions: &[RoundAction], round: u32, player_id: &str) -> i64 {
    actions
        .iter()
        .filter(|a| {
            a.round == round && a.kind == ActionKind::Archive && a.player_id == player_id
        })
        .min_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms))
        .and_then(|a| a.data.as_deref())
        .and_then(|d| d.parse::<i64>().ok())
        .unwrap_or(0)
}

/// True when every listed player has archived this round.
pub fn round_complete(actions: &[RoundAction], round: u32, players: &[String]) -> bool {
    let archived = archived_players(actions, round);
    !players.is_empty() && players.iter().all(|p| archived.contains(p.as_str()))
}

/// Current coop selections, derived by toggle parity per (player, section):
/// an odd number of select actions means currently selected.
pub fn coop_selections(actions: &[RoundAction], round: u32) -> Vec<(String, String)> {
    let mut toggles: HashMap<(&str, String), u32> = HashMap::new();
    let mut order: Vec<(&str, String)> = Vec::new();

    for action in actions {
        if action.round != round || action.kind != ActionKind::Select {
            continue;
        }
        let Some(data) = action.data.as_deref() else {
            continue;
        };
        // Skip malformed payloads rather than failing the whole derivation
        let Ok(payload) = serde_json::from_str::<SelectPayload>(data) else {
            continue;
        };
        let key = (action.player_id.as_str(), payload.section_id);
        let count = toggles.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|key| toggles.get(key).is_some_and(|c| c % 2 == 1))
        .map(|(player, section)| (player.to_string(), section))
        .collect()
}

/// Deterministic content-variant index for a round. Every client hashes the
/// same (room code, round) to the same index, so no coordination is needed to
/// agree on the round's page.
pub fn content_variant_index(room_code: &str, round: u32, variant_count: usize) -> usize {
    if variant_count == 0 {
        return 0;
    }
    // FNV-1a over the code bytes plus the round
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in room_code.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash ^= u64::from(round);
    hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    (hash % variant_count as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(player: &str, round: u32, kind: ActionKind, data: Option<&str>, ts: f64) -> RoundAction {
        RoundAction {
            room_code: "ABCDEF".to_string(),
            player_id: player.to_string(),
            round,
            kind,
            data: data.map(str::to_string),
            timestamp_ms: ts,
        }
    }

    #[test]
    fn test_archived_set_ignores_duplicates_and_order() {
        let log = vec![
            action("b", 2, ActionKind::Archive, Some("150"), 30.0),
            action("a", 2, ActionKind::Archive, Some("100"), 10.0),
            action("a", 2, ActionKind::Archive, Some("999"), 20.0),
            action("a", 1, ActionKind::Archive, Some("50"), 5.0),
        ];
        let archived = archived_players(&log, 2);
        assert_eq!(archived.len(), 2);
        assert!(archived.contains("a") && archived.contains("b"));
    }

    #[test]
    fn test_first_archive_score_wins() {
        let log = vec![
            action("a", 1, ActionKind::Archive, Some("999"), 20.0),
            action("a", 1, ActionKind::Archive, Some("100"), 10.0),
        ];
        assert_eq!(archived_score(&log, 1, "a"), 100);
        assert_eq!(archived_score(&log, 1, "missing"), 0);
    }

    #[test]
    fn test_round_complete() {
        let players = vec!["a".to_string(), "b".to_string()];
        let mut log = vec![action("a", 1, ActionKind::Archive, Some("0"), 1.0)];
        assert!(!round_complete(&log, 1, &players));
        log.push(action("b", 1, ActionKind::Archive, Some("0"), 2.0));
        assert!(round_complete(&log, 1, &players));
        // Wrong round doesn't count
        assert!(!round_complete(&log, 2, &players));
        // Empty roster is never complete
        assert!(!round_complete(&log, 1, &[]));
    }

    #[test]
    fn test_coop_selection_parity() {
        let sel = |player: &str, section: &str, ts: f64| {
            action(
                player,
                1,
                ActionKind::Select,
                Some(&format!("{{\"sectionId\":\"{section}\"}}")),
                ts,
            )
        };
        let log = vec![
            sel("a", "s1", 1.0), // select
            sel("a", "s2", 2.0), // select
            sel("a", "s1", 3.0), // deselect
            sel("b", "s1", 4.0), // select (independent of a's toggles)
            action("a", 1, ActionKind::Select, Some("not json"), 5.0),
        ];
        let mut selections = coop_selections(&log, 1);
        selections.sort();
        assert_eq!(
            selections,
            vec![
                ("a".to_string(), "s2".to_string()),
                ("b".to_string(), "s1".to_string()),
            ]
        );
    }

    #[test]
    fn test_coop_reselect_after_deselect() {
        let sel = |ts: f64| {
            action(
                "a",
                1,
                ActionKind::Select,
                Some("{\"sectionId\":\"s1\"}"),
                ts,
            )
        };
        let log = vec![sel(1.0), sel(2.0), sel(3.0)];
        assert_eq!(
            coop_selections(&log, 1),
            vec![("a".to_string(), "s1".to_string())]
        );
    }

    #[test]
    fn test_variant_index_stable_and_bounded() {
        for round in 0..20 {
            let idx = content_variant_index("ABCDEF", round, 7);
            assert!(idx < 7);
            assert_eq!(idx, content_variant_index("ABCDEF", round, 7));
        }
        // Different rooms generally land on different variants
        let spread: HashSet<_> = (0..50)
            .map(|i| content_variant_index(&format!("ROOM{i:02}"), 1, 7))
            .collect();
        assert!(spread.len() > 1);
    }

    #[test]
    fn test_variant_index_zero_count() {
        assert_eq!(content_variant_index("ABCDEF", 1, 0), 0);
    }
}
