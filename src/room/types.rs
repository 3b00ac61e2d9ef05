//! Room records and identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{GameState, PlayerId};

/// Opaque room identifier chosen by the transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Transport connection handle (socket id, session id, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A connection bound to a player inside a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub connection: ConnectionId,
    pub player_id: PlayerId,
}

/// One room: who is in it and the game they are playing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    /// Members in join order; join order becomes seat order.
    pub members: Vec<Member>,
    pub required_players: usize,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub game: Option<GameState>,
}

impl Room {
    #[must_use]
    pub fn new(id: RoomId, required_players: usize) -> Self {
        Self {
            id,
            members: Vec::new(),
            required_players,
            created_at: Utc::now(),
            started_at: None,
            game: None,
        }
    }

    /// Player IDs in join order.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.members.iter().map(|m| m.player_id.clone()).collect()
    }

    /// Is a player already bound in this room?
    #[must_use]
    pub fn has_player(&self, player_id: &PlayerId) -> bool {
        self.members.iter().any(|m| &m.player_id == player_id)
    }

    /// A game has been started in this room, finished or not.
    #[must_use]
    pub fn has_started_game(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.game_started)
    }

    /// A game has started and is not yet over.
    #[must_use]
    pub fn game_in_progress(&self) -> bool {
        self.game
            .as_ref()
            .is_some_and(|g| g.game_started && !g.game_over)
    }
}
