//! Multiplayer rooms
//!
//! The room store is the single server-authoritative source of truth; clients
//! hold read-only snapshots pushed to them and call mutations that validate
//! their own preconditions, so duplicate or racing submissions can never
//! double-score a round. Client-side decisions (round completion, the host
//! safety net, abandonment wins) are pure functions over the latest snapshot
//! in [`coordinator`].

pub mod actions;
pub mod coordinator;
pub mod store;
pub mod types;

pub use actions::{ActionKind, RoundAction, archived_players, coop_selections};
pub use coordinator::{AbandonmentWatch, RoundCoordinator, RoundEndDecision};
pub use store::{RoomError, RoomStore};
pub use types::{PlayerEntry, Room, RoomMode, RoomStatus};
