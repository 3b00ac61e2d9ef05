//! Thread-safe handle to a `GameService`.
//!
//! Every call takes the lock for its whole duration, so actions on any room
//! are serialized and each runs to completion before the next starts.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{DiceSource, GameState, PlayerId, SystemDice, TokenId};
use crate::room::{ConnectionId, JoinOutcome, LeaveOutcome, RoomId};
use crate::rules::LegalMove;

use super::game::{GameService, MoveOutcome, PassOutcome, RollOutcome, ServiceError};

/// Cloneable, lock-guarded `GameService`.
pub struct SharedGameService<D = SystemDice> {
    inner: Arc<Mutex<GameService<D>>>,
}

impl<D> Clone for SharedGameService<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: DiceSource> SharedGameService<D> {
    #[must_use]
    pub fn new(service: GameService<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Run `f` with exclusive access to the service.
    pub fn with<R>(&self, f: impl FnOnce(&mut GameService<D>) -> R) -> R {
        let mut service = self.inner.lock();
        f(&mut *service)
    }

    pub fn join_room(
        &self,
        room_id: &RoomId,
        connection: ConnectionId,
        player_id: PlayerId,
        required_players: Option<usize>,
    ) -> Result<JoinOutcome, ServiceError> {
        self.inner
            .lock()
            .join_room(room_id, connection, player_id, required_players)
    }

    pub fn leave_room(&self, connection: &ConnectionId) -> Result<LeaveOutcome, ServiceError> {
        self.inner.lock().leave_room(connection)
    }

    /// Snapshot of a room's game state.
    #[must_use]
    pub fn game_state(&self, room_id: &RoomId) -> Option<GameState> {
        self.inner.lock().game_state(room_id).cloned()
    }

    pub fn start_game(&self, room_id: &RoomId) -> Result<GameState, ServiceError> {
        self.inner.lock().start_game(room_id)
    }

    pub fn roll_dice(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<RollOutcome, ServiceError> {
        self.inner.lock().roll_dice(room_id, player_id)
    }

    pub fn move_token(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
        token_id: TokenId,
        dice_index: usize,
    ) -> Result<MoveOutcome, ServiceError> {
        self.inner
            .lock()
            .move_token(room_id, player_id, token_id, dice_index)
    }

    pub fn pass_turn(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<PassOutcome, ServiceError> {
        self.inner.lock().pass_turn(room_id, player_id)
    }

    pub fn legal_moves(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<Vec<LegalMove>, ServiceError> {
        self.inner.lock().legal_moves(room_id, player_id)
    }
}
