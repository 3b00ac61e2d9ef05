//! Turn orchestration for rooms.
//!
//! `GameService` handles one externally triggered action at a time:
//! 1. Pull the room's `GameState` out of the `RoomRegistry`
//! 2. Let the `RulesEngine` compute the transition on a working copy
//! 3. Write the copy back only if the action succeeded
//!
//! A rejected action therefore never changes what the registry holds.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{ConfigError, DiceRoll, DiceSource, GameState, PlayerId, RulesConfig, SystemDice, TokenId};
use crate::room::{ConnectionId, JoinOutcome, LeaveOutcome, RoomError, RoomId, RoomRegistry};
use crate::rules::{GameStateFactory, LegalMove, MoveError, MoveErrorCode, MoveResult, RulesEngine};

/// Why a service action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("the game in room {0} has not started")]
    GameNotStarted(RoomId),
    #[error("the game in room {0} is over")]
    GameOver(RoomId),
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("dice have already been rolled this turn")]
    DiceAlreadyRolled,
    #[error("{0} has not rolled yet")]
    NoPendingRoll(PlayerId),
    #[error("a legal move is still available")]
    MovesAvailable,
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error(transparent)]
    Move(#[from] MoveError),
}

impl ServiceError {
    /// Rule code, when the failure maps onto one.
    #[must_use]
    pub fn code(&self) -> Option<MoveErrorCode> {
        match self {
            ServiceError::Move(err) => Some(err.code()),
            ServiceError::NotYourTurn(_) => Some(MoveErrorCode::NotYourTurn),
            ServiceError::NoPendingRoll(_) => Some(MoveErrorCode::NoPendingDice),
            _ => None,
        }
    }

    /// Code reported for a rejected move: the specific rule code, or
    /// `MOVE_NOT_LEGAL` when the game itself refused the action.
    #[must_use]
    pub fn move_code(&self) -> MoveErrorCode {
        self.code().unwrap_or(MoveErrorCode::MoveNotLegal)
    }
}

/// Result of a roll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    pub dice: DiceRoll,
    pub legal_moves: Vec<LegalMove>,
    /// No move was possible, so the turn already passed.
    pub auto_advanced: bool,
    /// Who plays next, when the turn passed.
    pub next_player: Option<PlayerId>,
    pub game_state: GameState,
}

/// Result of a move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    #[serde(flatten)]
    pub result: MoveResult,
    pub game_won: bool,
    pub turn_advanced: bool,
    /// Whose action is next; `None` once the game is won.
    pub next_player: Option<PlayerId>,
    pub game_state: GameState,
}

/// Result of forfeiting the rest of a roll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassOutcome {
    pub next_player: Option<PlayerId>,
    pub game_state: GameState,
}

/// Runs start / roll / move / pass actions against rooms.
pub struct GameService<D = SystemDice> {
    registry: RoomRegistry,
    engine: RulesEngine,
    dice: D,
}

impl<D: DiceSource> GameService<D> {
    /// Assemble a service from its parts.
    #[must_use]
    pub fn new(registry: RoomRegistry, engine: RulesEngine, dice: D) -> Self {
        Self {
            registry,
            engine,
            dice,
        }
    }

    /// Build an empty registry and engine sharing one board configuration.
    pub fn from_config(config: RulesConfig, dice: D) -> Result<Self, ConfigError> {
        let engine = RulesEngine::new(config.clone())?;
        let registry = RoomRegistry::new(GameStateFactory::new(config));
        Ok(Self::new(registry, engine, dice))
    }

    #[must_use]
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Direct registry access, for hosts that restore or seed rooms.
    pub fn registry_mut(&mut self) -> &mut RoomRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    // === Rooms ===

    pub fn join_room(
        &mut self,
        room_id: &RoomId,
        connection: ConnectionId,
        player_id: PlayerId,
        required_players: Option<usize>,
    ) -> Result<JoinOutcome, ServiceError> {
        Ok(self
            .registry
            .join_room(room_id, connection, player_id, required_players)?)
    }

    /// Unbind a connection. A seated player leaving a running game is taken
    /// out of the turn rotation, which may end the game.
    pub fn leave_room(&mut self, connection: &ConnectionId) -> Result<LeaveOutcome, ServiceError> {
        let mut outcome = self.registry.leave_room(connection)?;
        if outcome.room_closed {
            return Ok(outcome);
        }

        let Some(mut state) = self
            .registry
            .game_state(&outcome.room_id)
            .filter(|g| g.game_started && !g.game_over)
            .cloned()
        else {
            return Ok(outcome);
        };

        outcome.game_ended = self.engine.withdraw_player(&mut state, &outcome.player_id);
        if outcome.game_ended {
            info!(
                room_id = %outcome.room_id,
                player_id = %outcome.player_id,
                winner = ?state.winner.as_ref().map(PlayerId::as_str),
                "game ended by departure"
            );
        } else {
            debug!(room_id = %outcome.room_id, player_id = %outcome.player_id, "seat withdrawn");
        }

        self.registry.update_game_state(&outcome.room_id, state)?;
        Ok(outcome)
    }

    /// Current game state of a room, if any.
    #[must_use]
    pub fn game_state(&self, room_id: &RoomId) -> Option<&GameState> {
        self.registry.game_state(room_id)
    }

    pub fn start_game(&mut self, room_id: &RoomId) -> Result<GameState, ServiceError> {
        Ok(self.registry.start_game(room_id)?)
    }

    // === Turns ===

    /// Roll for the current player.
    ///
    /// If the roll allows no move at all the turn passes immediately.
    pub fn roll_dice(&mut self, room_id: &RoomId, player_id: &PlayerId) -> Result<RollOutcome, ServiceError> {
        let mut state = self.active_game(room_id)?;
        if !self.engine.is_player_turn(&state, player_id) {
            return Err(ServiceError::NotYourTurn(player_id.clone()));
        }
        if state.pending_dice.is_some() {
            return Err(ServiceError::DiceAlreadyRolled);
        }

        let dice = self.engine.roll_dice(&mut self.dice);
        self.engine.attach_pending_dice(&mut state, dice.clone());
        let legal_moves = self.engine.legal_moves(&state, player_id);
        debug!(
            room_id = %room_id,
            player_id = %player_id,
            dice = ?dice.as_slice(),
            legal = legal_moves.len(),
            "dice rolled"
        );

        let (auto_advanced, next_player) = if legal_moves.is_empty() {
            self.engine.advance_turn(&mut state);
            let next = state.current_player().map(|p| p.id.clone());
            debug!(room_id = %room_id, player_id = %player_id, "no legal move, turn skipped");
            (true, next)
        } else {
            (false, None)
        };

        self.registry.update_game_state(room_id, state.clone())?;

        Ok(RollOutcome {
            dice,
            legal_moves,
            auto_advanced,
            next_player,
            game_state: state,
        })
    }

    /// Move one of the current player's tokens with one pending die.
    pub fn move_token(
        &mut self,
        room_id: &RoomId,
        player_id: &PlayerId,
        token_id: TokenId,
        dice_index: usize,
    ) -> Result<MoveOutcome, ServiceError> {
        let mut state = self.active_game(room_id)?;
        let result = self.engine.apply_move(&mut state, player_id, token_id, dice_index)?;
        debug!(
            room_id = %room_id,
            player_id = %player_id,
            token_id = token_id.0,
            dice_index,
            from = %result.old_position,
            to = %result.new_position,
            "token moved"
        );
        if !result.captured_tokens.is_empty() {
            info!(
                room_id = %room_id,
                player_id = %player_id,
                captured = result.captured_tokens.len(),
                bonus = result.capture_bonus,
                "capture"
            );
        }

        let game_won = state
            .player(player_id)
            .is_some_and(|p| self.engine.check_win(p));
        if game_won {
            state.game_over = true;
            state.winner = Some(player_id.clone());
            info!(room_id = %room_id, winner = %player_id, "game won");
        }

        let turn_advanced = game_won || self.engine.should_advance_turn(&state);
        if turn_advanced {
            self.engine.advance_turn(&mut state);
        }
        let next_player = if game_won {
            None
        } else {
            state.current_player().map(|p| p.id.clone())
        };

        self.registry.update_game_state(room_id, state.clone())?;

        Ok(MoveOutcome {
            result,
            game_won,
            turn_advanced,
            next_player,
            game_state: state,
        })
    }

    /// Give up the unused dice when none of them can move anything.
    pub fn pass_turn(&mut self, room_id: &RoomId, player_id: &PlayerId) -> Result<PassOutcome, ServiceError> {
        let mut state = self.active_game(room_id)?;
        if !self.engine.is_player_turn(&state, player_id) {
            return Err(ServiceError::NotYourTurn(player_id.clone()));
        }
        if state.pending_dice.is_none() {
            return Err(ServiceError::NoPendingRoll(player_id.clone()));
        }
        if self.engine.has_legal_move(&state, player_id) {
            return Err(ServiceError::MovesAvailable);
        }

        self.engine.advance_turn(&mut state);
        let next_player = state.current_player().map(|p| p.id.clone());
        debug!(room_id = %room_id, player_id = %player_id, "turn passed");

        self.registry.update_game_state(room_id, state.clone())?;

        Ok(PassOutcome {
            next_player,
            game_state: state,
        })
    }

    /// Legal moves for a player's pending roll.
    pub fn legal_moves(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<Vec<LegalMove>, ServiceError> {
        let state = self
            .registry
            .game_state(room_id)
            .ok_or_else(|| self.missing_game(room_id))?;
        Ok(self.engine.legal_moves(state, player_id))
    }

    /// Working copy of a room's running game.
    fn active_game(&self, room_id: &RoomId) -> Result<GameState, ServiceError> {
        let state = self
            .registry
            .game_state(room_id)
            .ok_or_else(|| self.missing_game(room_id))?;

        if !state.game_started {
            return Err(ServiceError::GameNotStarted(room_id.clone()));
        }
        if state.game_over {
            return Err(ServiceError::GameOver(room_id.clone()));
        }
        Ok(state.clone())
    }

    fn missing_game(&self, room_id: &RoomId) -> ServiceError {
        if self.registry.room(room_id).is_some() {
            ServiceError::GameNotStarted(room_id.clone())
        } else {
            ServiceError::RoomNotFound(room_id.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScriptedDice, TokenPosition};

    fn service(faces: Vec<u8>) -> GameService<ScriptedDice> {
        GameService::from_config(RulesConfig::default(), ScriptedDice::new(faces)).unwrap()
    }

    fn started(faces: Vec<u8>) -> (GameService<ScriptedDice>, RoomId) {
        let mut svc = service(faces);
        let room = RoomId::new("room");
        svc.join_room(&room, ConnectionId::new("c1"), PlayerId::new("p1"), None)
            .unwrap();
        svc.join_room(&room, ConnectionId::new("c2"), PlayerId::new("p2"), None)
            .unwrap();
        svc.start_game(&room).unwrap();
        (svc, room)
    }

    #[test]
    fn test_roll_requires_started_game() {
        let mut svc = service(vec![6]);
        let room = RoomId::new("room");

        assert_eq!(
            svc.roll_dice(&room, &PlayerId::new("p1")),
            Err(ServiceError::RoomNotFound(room.clone()))
        );

        svc.join_room(&room, ConnectionId::new("c1"), PlayerId::new("p1"), None)
            .unwrap();
        assert_eq!(
            svc.roll_dice(&room, &PlayerId::new("p1")),
            Err(ServiceError::GameNotStarted(room))
        );
    }

    #[test]
    fn test_roll_wrong_turn() {
        let (mut svc, room) = started(vec![6, 2]);
        assert_eq!(
            svc.roll_dice(&room, &PlayerId::new("p2")),
            Err(ServiceError::NotYourTurn(PlayerId::new("p2")))
        );
    }

    #[test]
    fn test_roll_returns_moves() {
        let (mut svc, room) = started(vec![6, 2]);
        let outcome = svc.roll_dice(&room, &PlayerId::new("p1")).unwrap();

        assert_eq!(outcome.dice.as_slice(), &[6, 2]);
        assert!(!outcome.auto_advanced);
        assert_eq!(outcome.legal_moves.len(), 4);
        assert_eq!(
            svc.game_state(&room).unwrap().pending_dice.as_deref(),
            Some(&[6, 2][..])
        );
    }

    #[test]
    fn test_no_reroll_mid_turn() {
        let (mut svc, room) = started(vec![6, 2]);
        svc.roll_dice(&room, &PlayerId::new("p1")).unwrap();

        assert_eq!(
            svc.roll_dice(&room, &PlayerId::new("p1")),
            Err(ServiceError::DiceAlreadyRolled)
        );
    }

    #[test]
    fn test_roll_without_moves_auto_advances() {
        let (mut svc, room) = started(vec![3, 2]);
        let outcome = svc.roll_dice(&room, &PlayerId::new("p1")).unwrap();

        assert!(outcome.auto_advanced);
        assert!(outcome.legal_moves.is_empty());
        assert_eq!(outcome.next_player, Some(PlayerId::new("p2")));

        let state = svc.game_state(&room).unwrap();
        assert_eq!(state.current_player_index, 1);
        assert!(state.pending_dice.is_none());
    }

    #[test]
    fn test_move_then_turn_advances_after_all_dice() {
        let (mut svc, room) = started(vec![6, 6]);
        let p1 = PlayerId::new("p1");
        svc.roll_dice(&room, &p1).unwrap();

        let first = svc.move_token(&room, &p1, TokenId::new(0), 0).unwrap();
        assert!(!first.turn_advanced);
        assert_eq!(first.next_player, Some(p1.clone()));
        assert_eq!(first.result.new_position, TokenPosition::OnTrack(5));

        let second = svc.move_token(&room, &p1, TokenId::new(0), 1).unwrap();
        assert!(second.result.all_dice_used);
        assert!(second.turn_advanced);
        assert_eq!(second.next_player, Some(PlayerId::new("p2")));
        assert_eq!(second.game_state.players[0].tokens[0].position, TokenPosition::OnTrack(11));
    }

    #[test]
    fn test_rejected_move_persists_nothing() {
        let (mut svc, room) = started(vec![6, 2]);
        let p1 = PlayerId::new("p1");
        svc.roll_dice(&room, &p1).unwrap();
        let before = svc.game_state(&room).unwrap().clone();

        let err = svc.move_token(&room, &p1, TokenId::new(0), 1).unwrap_err();
        assert_eq!(err.move_code(), MoveErrorCode::NeedSixToEnter);
        assert_eq!(svc.game_state(&room).unwrap(), &before);
    }

    #[test]
    fn test_pass_turn() {
        let (mut svc, room) = started(vec![6, 2]);
        let p1 = PlayerId::new("p1");

        assert_eq!(
            svc.pass_turn(&room, &p1),
            Err(ServiceError::NoPendingRoll(p1.clone()))
        );

        svc.roll_dice(&room, &p1).unwrap();
        assert_eq!(svc.pass_turn(&room, &p1), Err(ServiceError::MovesAvailable));

        // Enter with the 6; the 2 can still move the entered token.
        svc.move_token(&room, &p1, TokenId::new(0), 0).unwrap();
        assert_eq!(svc.pass_turn(&room, &p1), Err(ServiceError::MovesAvailable));
    }

    #[test]
    fn test_pass_turn_when_stuck() {
        let (mut svc, room) = started(vec![6, 2]);
        let p1 = PlayerId::new("p1");

        // Put an opponent barrier right in front of the start cell.
        let mut state = svc.game_state(&room).unwrap().clone();
        state.players[1].tokens[0].position = TokenPosition::OnTrack(7);
        state.players[1].tokens[1].position = TokenPosition::OnTrack(7);
        svc.registry.update_game_state(&room, state).unwrap();

        svc.roll_dice(&room, &p1).unwrap();
        svc.move_token(&room, &p1, TokenId::new(0), 0).unwrap();

        let outcome = svc.pass_turn(&room, &p1).unwrap();
        assert_eq!(outcome.next_player, Some(PlayerId::new("p2")));
        assert!(outcome.game_state.pending_dice.is_none());
    }

    #[test]
    fn test_leave_on_turn_passes_play() {
        let mut svc = service(vec![6, 2]);
        let room = RoomId::new("room");
        for (conn, name) in [("c1", "p1"), ("c2", "p2"), ("c3", "p3")] {
            svc.join_room(&room, ConnectionId::new(conn), PlayerId::new(name), Some(3))
                .unwrap();
        }
        svc.start_game(&room).unwrap();
        svc.roll_dice(&room, &PlayerId::new("p1")).unwrap();

        let outcome = svc.leave_room(&ConnectionId::new("c1")).unwrap();
        assert!(!outcome.game_ended);

        let state = svc.game_state(&room).unwrap();
        assert_eq!(state.current_player_index, 1);
        assert!(state.players[0].withdrawn);
        assert!(svc.roll_dice(&room, &PlayerId::new("p2")).is_ok());
    }

    #[test]
    fn test_service_error_codes() {
        assert_eq!(
            ServiceError::NotYourTurn(PlayerId::new("x")).move_code(),
            MoveErrorCode::NotYourTurn
        );
        assert_eq!(
            ServiceError::GameOver(RoomId::new("r")).move_code(),
            MoveErrorCode::MoveNotLegal
        );
        assert_eq!(ServiceError::DiceAlreadyRolled.code(), None);
    }
}
