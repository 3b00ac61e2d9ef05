//! In-memory room registry.
//!
//! The `RoomRegistry` is the single authority for:
//! - Which rooms exist and who is in them
//! - Which connection is bound to which (room, player)
//! - Each room's current `GameState`
//!
//! It is an ordinary value: build one per service (or per test) and pass it
//! in. Nothing is global, and dropping the registry drops every room.

use chrono::Utc;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{GameState, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::{GameStateFactory, SetupError};

use super::types::{ConnectionId, Member, Room, RoomId};

/// Why a room operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("room {0} already has a game in progress")]
    GameInProgress(RoomId),
    #[error("room {0} is full")]
    RoomFull(RoomId),
    #[error("player {player_id} is already in room {room_id}")]
    PlayerAlreadyInRoom { room_id: RoomId, player_id: PlayerId },
    #[error("connection {0} is already in a room")]
    ConnectionAlreadyBound(ConnectionId),
    #[error("connection {0} is not in any room")]
    ConnectionNotFound(ConnectionId),
    #[error("a room needs 2 to 4 players, got {0}")]
    InvalidRequiredPlayers(usize),
    #[error("room {room_id} needs at least 2 players to start, has {present}")]
    NotEnoughPlayers { room_id: RoomId, present: usize },
    #[error("room {0} has already started a game")]
    GameAlreadyStarted(RoomId),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Result of a successful join.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub player_count: usize,
    pub required_players: usize,
    pub players: Vec<PlayerId>,
    /// The room just filled up and no game exists yet.
    pub should_auto_start: bool,
}

/// Result of a successful leave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub remaining_players: usize,
    /// The room was empty after the leave and has been deleted.
    pub room_closed: bool,
    /// The departure left too few seats and ended the running game.
    pub game_ended: bool,
}

/// Owns every room and the connection bindings into them.
#[derive(Clone, Debug)]
pub struct RoomRegistry {
    rooms: FxHashMap<RoomId, Room>,
    /// connection -> (room, player)
    bindings: FxHashMap<ConnectionId, (RoomId, PlayerId)>,
    factory: GameStateFactory,
    default_required_players: usize,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(GameStateFactory::default())
    }
}

impl RoomRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(factory: GameStateFactory) -> Self {
        let default_required_players = factory.config().default_required_players;
        Self {
            rooms: FxHashMap::default(),
            bindings: FxHashMap::default(),
            factory,
            default_required_players,
        }
    }

    // === Membership ===

    /// Bind a connection to a player in a room, creating the room if needed.
    ///
    /// `required_players` only matters when the room is created; later joins
    /// inherit the room's size.
    pub fn join_room(
        &mut self,
        room_id: &RoomId,
        connection: ConnectionId,
        player_id: PlayerId,
        required_players: Option<usize>,
    ) -> Result<JoinOutcome, RoomError> {
        if self.bindings.contains_key(&connection) {
            return Err(RoomError::ConnectionAlreadyBound(connection));
        }

        if !self.rooms.contains_key(room_id) {
            let required = required_players.unwrap_or(self.default_required_players);
            if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&required) {
                return Err(RoomError::InvalidRequiredPlayers(required));
            }
            info!(room_id = %room_id, required, "room created");
            self.rooms.insert(room_id.clone(), Room::new(room_id.clone(), required));
        }

        let Some(room) = self.rooms.get_mut(room_id) else {
            return Err(RoomError::RoomNotFound(room_id.clone()));
        };

        if room.has_started_game() {
            return Err(RoomError::GameInProgress(room_id.clone()));
        }
        if room.members.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull(room_id.clone()));
        }
        if room.has_player(&player_id) {
            return Err(RoomError::PlayerAlreadyInRoom {
                room_id: room_id.clone(),
                player_id,
            });
        }

        room.members.push(Member {
            connection: connection.clone(),
            player_id: player_id.clone(),
        });
        self.bindings
            .insert(connection.clone(), (room_id.clone(), player_id.clone()));

        let player_count = room.members.len();
        let should_auto_start = player_count == room.required_players && room.game.is_none();
        debug!(
            room_id = %room_id,
            player_id = %player_id,
            connection = %connection,
            player_count,
            "player joined"
        );

        Ok(JoinOutcome {
            room_id: room_id.clone(),
            player_count,
            required_players: room.required_players,
            players: room.player_ids(),
            should_auto_start,
        })
    }

    /// Drop a connection's binding. Deletes the room once it is empty.
    pub fn leave_room(&mut self, connection: &ConnectionId) -> Result<LeaveOutcome, RoomError> {
        let (room_id, player_id) = self
            .bindings
            .remove(connection)
            .ok_or_else(|| RoomError::ConnectionNotFound(connection.clone()))?;

        let remaining_players = match self.rooms.get_mut(&room_id) {
            Some(room) => {
                room.members.retain(|m| &m.connection != connection);
                room.members.len()
            }
            None => 0,
        };

        let room_closed = remaining_players == 0;
        if room_closed {
            self.rooms.remove(&room_id);
            info!(room_id = %room_id, "room closed");
        } else {
            debug!(room_id = %room_id, player_id = %player_id, remaining_players, "player left");
        }

        Ok(LeaveOutcome {
            room_id,
            player_id,
            remaining_players,
            room_closed,
            game_ended: false,
        })
    }

    // === Games ===

    /// Seat the current members and start a game.
    ///
    /// A finished game may be replaced; a running one may not.
    pub fn start_game(&mut self, room_id: &RoomId) -> Result<GameState, RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;

        if room.members.len() < MIN_PLAYERS {
            return Err(RoomError::NotEnoughPlayers {
                room_id: room_id.clone(),
                present: room.members.len(),
            });
        }
        if room.game_in_progress() {
            return Err(RoomError::GameAlreadyStarted(room_id.clone()));
        }

        let mut state = self.factory.create_game_state(&room.player_ids())?;
        state.game_started = true;
        state.touch();

        room.started_at = Some(Utc::now());
        room.game = Some(state.clone());
        info!(room_id = %room_id, players = room.members.len(), "game started");

        Ok(state)
    }

    /// Current game state of a room, if a game exists.
    #[must_use]
    pub fn game_state(&self, room_id: &RoomId) -> Option<&GameState> {
        self.rooms.get(room_id)?.game.as_ref()
    }

    /// Replace a room's game state.
    pub fn update_game_state(&mut self, room_id: &RoomId, state: GameState) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        room.game = Some(state);
        Ok(())
    }

    // === Lookups ===

    /// Room a connection is bound to.
    #[must_use]
    pub fn room_id_by_connection(&self, connection: &ConnectionId) -> Option<&RoomId> {
        self.bindings.get(connection).map(|(room_id, _)| room_id)
    }

    /// Player a connection is bound to.
    #[must_use]
    pub fn player_id_by_connection(&self, connection: &ConnectionId) -> Option<&PlayerId> {
        self.bindings.get(connection).map(|(_, player_id)| player_id)
    }

    /// Look up a room.
    #[must_use]
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Number of live rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
