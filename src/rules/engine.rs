//! The rules engine: dice, legal moves, move application, turns, wins.
//!
//! `RulesEngine` holds only the board configuration. Every operation takes the
//! `GameState` it works on, so the engine knows nothing about rooms or
//! transport.
//!
//! ## Turn Flow
//!
//! 1. `roll_dice` + `attach_pending_dice`
//! 2. `legal_moves` to see what the roll allows
//! 3. `apply_move` once per die the player spends
//! 4. `should_advance_turn` / `advance_turn` when every die is used
//!
//! ## Determinism
//!
//! Given the same state and the same dice, every function returns the same
//! result. Randomness only enters through the `DiceSource` passed to
//! `roll_dice`.

use tracing::trace;

use crate::core::{
    ConfigError, DiceRoll, DiceSource, GameState, Player, PlayerId, RulesConfig, Token, TokenId,
    TokenPosition, DIE_FACES, TOKENS_PER_PLAYER,
};

use super::error::{MoveError, MoveErrorCode};
use super::moves::{CapturedToken, Destination, LegalMove, MoveResult};

/// Stateless rules over a configured board.
#[derive(Clone, Debug)]
pub struct RulesEngine {
    config: RulesConfig,
}

impl RulesEngine {
    /// Create an engine, rejecting unplayable board configurations.
    pub fn new(config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the board configuration.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    // === Dice ===

    /// Roll a fresh set of dice.
    pub fn roll_dice<D: DiceSource + ?Sized>(&self, dice: &mut D) -> DiceRoll {
        (0..self.config.dice_per_roll).map(|_| dice.roll_die()).collect()
    }

    /// Make `dice` the current player's pending roll with nothing spent yet.
    pub fn attach_pending_dice(&self, state: &mut GameState, dice: DiceRoll) {
        state.used_dice = vec![false; dice.len()];
        state.pending_dice = Some(dice);
        state.touch();
    }

    // === Legal Moves ===

    /// Every legal (token, die) pairing for a player's pending roll.
    ///
    /// Empty when nothing is pending or the player is unknown.
    #[must_use]
    pub fn legal_moves(&self, state: &GameState, player_id: &PlayerId) -> Vec<LegalMove> {
        let Some(player) = state.player(player_id) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        for (dice_index, dice_value) in state.unused_dice() {
            for token in player.tokens.iter().filter(|t| !t.is_finished()) {
                if let Some(dest) = self.token_legal_move(token, dice_value, player, state) {
                    moves.push(LegalMove::new(token.id, dice_index, dice_value, dest));
                }
            }
        }
        moves
    }

    /// Does the player have at least one legal move for the pending roll?
    #[must_use]
    pub fn has_legal_move(&self, state: &GameState, player_id: &PlayerId) -> bool {
        let Some(player) = state.player(player_id) else {
            return false;
        };

        state.unused_dice().any(|(_, dice_value)| {
            player
                .tokens
                .iter()
                .any(|t| self.token_legal_move(t, dice_value, player, state).is_some())
        })
    }

    /// The single destination a token reaches with `dice_value`, if legal.
    #[must_use]
    pub fn token_legal_move(
        &self,
        token: &Token,
        dice_value: u8,
        player: &Player,
        state: &GameState,
    ) -> Option<Destination> {
        self.resolve_destination(token, dice_value, player, state).ok()
    }

    /// Resolve a token's destination, keeping the reason when it is illegal.
    ///
    /// Rules, in priority order:
    /// - In base: needs the entry roll; the start cell must hold no barrier,
    ///   and no opponent if it is a safe cell.
    /// - In the home row: must land exactly on or before the finish threshold.
    ///   A position outside `1..depth` is not a lane and cannot move.
    /// - On the track: walks forward one cell at a time; once standing on the
    ///   colour's home-entry cell the remaining steps go into the home row,
    ///   and must stop short of the finish threshold.
    ///   No barrier may sit on any traversed cell or on the destination.
    pub fn resolve_destination(
        &self,
        token: &Token,
        dice_value: u8,
        player: &Player,
        state: &GameState,
    ) -> Result<Destination, MoveErrorCode> {
        if !(1..=DIE_FACES).contains(&dice_value) {
            return Err(MoveErrorCode::MoveNotLegal);
        }
        let seat = state
            .player_index(&player.id)
            .ok_or(MoveErrorCode::PlayerNotFound)?;

        match token.position {
            TokenPosition::Finished => Err(MoveErrorCode::TokenFinished),
            TokenPosition::InBase => self.resolve_entry(dice_value, player, seat, state),
            TokenPosition::InHomeRow(pos) => self.resolve_home_row(pos, dice_value),
            TokenPosition::OnTrack(cell) => self.resolve_track(cell, dice_value, player, seat, state),
        }
    }

    fn resolve_entry(
        &self,
        dice_value: u8,
        player: &Player,
        seat: usize,
        state: &GameState,
    ) -> Result<Destination, MoveErrorCode> {
        if dice_value != self.config.entry_roll {
            return Err(MoveErrorCode::NeedSixToEnter);
        }

        let start = player.start_cell;
        if state.barrier_at(start) {
            return Err(MoveErrorCode::BarrierBlocked);
        }

        let occupied = state.opponent_on(start, seat);
        let safe = self.config.is_safe_cell(start);
        if occupied && safe {
            return Err(MoveErrorCode::CaptureOnSafe);
        }

        Ok(Destination {
            position: TokenPosition::OnTrack(start),
            captures_possible: occupied && !safe,
            enters_home_row: false,
        })
    }

    fn resolve_home_row(&self, pos: u8, dice_value: u8) -> Result<Destination, MoveErrorCode> {
        let depth = self.config.home_row_depth;
        if pos == 0 || pos >= depth {
            return Err(MoveErrorCode::InvalidHomeRowEntry);
        }
        let target = pos.saturating_add(dice_value);

        let position = match target.cmp(&depth) {
            std::cmp::Ordering::Greater => return Err(MoveErrorCode::OvershootHome),
            std::cmp::Ordering::Equal => TokenPosition::Finished,
            std::cmp::Ordering::Less => TokenPosition::InHomeRow(target),
        };

        Ok(Destination {
            position,
            captures_possible: false,
            enters_home_row: false,
        })
    }

    fn resolve_track(
        &self,
        from: u8,
        dice_value: u8,
        player: &Player,
        seat: usize,
        state: &GameState,
    ) -> Result<Destination, MoveErrorCode> {
        let mut cell = from;

        for step in 0..dice_value {
            if cell == player.home_entry_cell {
                return self.resolve_home_row_entry(dice_value - step);
            }

            cell = self.config.next_cell(cell);
            let is_last = step + 1 == dice_value;
            if !is_last && state.barrier_at(cell) {
                trace!(from, cell, "transit blocked by barrier");
                return Err(MoveErrorCode::BarrierBlocked);
            }
        }

        if state.barrier_at(cell) {
            return Err(MoveErrorCode::BarrierBlocked);
        }

        Ok(Destination {
            position: TokenPosition::OnTrack(cell),
            captures_possible: !self.config.is_safe_cell(cell) && state.opponent_on(cell, seat),
            enters_home_row: false,
        })
    }

    /// Spend `remaining` steps inside the home row after leaving the track.
    ///
    /// Reaching the finish threshold straight from the track is an overshoot;
    /// a token has to stand in the home row before it can finish.
    fn resolve_home_row_entry(&self, remaining: u8) -> Result<Destination, MoveErrorCode> {
        if remaining >= self.config.home_row_depth {
            return Err(MoveErrorCode::OvershootHome);
        }

        Ok(Destination {
            position: TokenPosition::InHomeRow(remaining),
            captures_possible: false,
            enters_home_row: true,
        })
    }

    // === Move Application ===

    /// Move one token with one pending die.
    ///
    /// Validation runs before any mutation, so a rejected move leaves `state`
    /// untouched.
    pub fn apply_move(
        &self,
        state: &mut GameState,
        player_id: &PlayerId,
        token_id: TokenId,
        dice_index: usize,
    ) -> Result<MoveResult, MoveError> {
        if !self.is_player_turn(state, player_id) {
            return Err(MoveError::NotYourTurn(player_id.clone()));
        }
        let seat = state
            .player_index(player_id)
            .ok_or_else(|| MoveError::PlayerNotFound(player_id.clone()))?;
        let player = &state.players[seat];

        let token = *player
            .token(token_id)
            .ok_or(MoveError::TokenNotFound(token_id))?;
        if token.is_finished() {
            return Err(MoveError::TokenFinished(token_id));
        }

        let dice_value = state
            .pending_die(dice_index)
            .ok_or(MoveError::NoPendingDice(dice_index))?;
        if state.used_dice.get(dice_index).copied().unwrap_or(true) {
            return Err(MoveError::DiceAlreadyUsed(dice_index));
        }

        let dest = self
            .resolve_destination(&token, dice_value, player, state)
            .map_err(|code| self.describe_rejection(code, &token, dice_value, player.start_cell))?;

        // Validated; mutate from here on.
        let player = &mut state.players[seat];
        if let Some(slot) = player.token_mut(token_id) {
            slot.position = dest.position;
        }
        let finished = dest.is_finish();
        if finished {
            player.finished_tokens += 1;
        }
        state.used_dice[dice_index] = true;

        let captured_tokens = match dest.position {
            TokenPosition::OnTrack(cell) if !self.config.is_safe_cell(cell) => {
                self.capture_at(state, cell, seat)
            }
            _ => Vec::new(),
        };
        let capture_bonus = if captured_tokens.is_empty() {
            0
        } else {
            self.config.capture_bonus
        };

        state.touch();
        trace!(
            player = %player_id,
            token = token_id.0,
            dice_value,
            to = %dest.position,
            "move applied"
        );

        Ok(MoveResult {
            token_id,
            dice_index,
            old_position: token.position,
            new_position: dest.position,
            finished,
            all_dice_used: self.should_advance_turn(state),
            captured_tokens,
            capture_bonus,
            entered_home_row: dest.enters_home_row,
        })
    }

    /// Send every opponent token on `cell` back to base.
    fn capture_at(&self, state: &mut GameState, cell: u8, seat: usize) -> Vec<CapturedToken> {
        let victims: Vec<_> = state.opponent_tokens_on(cell, seat).collect();

        victims
            .into_iter()
            .map(|(owner, token_id)| {
                let owner = &mut state.players[owner];
                if let Some(token) = owner.token_mut(token_id) {
                    token.position = TokenPosition::InBase;
                }
                CapturedToken {
                    player_id: owner.id.clone(),
                    token_id,
                    cell,
                }
            })
            .collect()
    }

    fn describe_rejection(
        &self,
        code: MoveErrorCode,
        token: &Token,
        dice_value: u8,
        start_cell: u8,
    ) -> MoveError {
        match code {
            MoveErrorCode::NeedSixToEnter => MoveError::NeedSixToEnter {
                needed: self.config.entry_roll,
                rolled: dice_value,
            },
            MoveErrorCode::BarrierBlocked => MoveError::BarrierBlocked,
            MoveErrorCode::CaptureOnSafe => MoveError::CaptureOnSafe(start_cell),
            MoveErrorCode::OvershootHome => MoveError::OvershootHome(dice_value),
            MoveErrorCode::InvalidHomeRowEntry => {
                MoveError::InvalidHomeRowEntry(token.home_row_position().unwrap_or(0))
            }
            MoveErrorCode::TokenFinished => MoveError::TokenFinished(token.id),
            _ => MoveError::MoveNotLegal,
        }
    }

    // === Turns ===

    /// Has every die of the pending roll been spent?
    #[must_use]
    pub fn should_advance_turn(&self, state: &GameState) -> bool {
        !state.used_dice.is_empty() && state.used_dice.iter().all(|&used| used)
    }

    /// Clear the roll and pass play to the next seat still in the game.
    pub fn advance_turn(&self, state: &mut GameState) {
        state.pending_dice = None;
        state.used_dice.clear();

        let count = state.player_count();
        let mut next = state.current_player_index;
        for _ in 0..count {
            next = (next + 1) % count;
            if !state.players[next].withdrawn {
                break;
            }
        }
        state.current_player_index = next;
        state.touch();
    }

    /// Take a departed player out of the rotation.
    ///
    /// Their tokens on the shared track go back to base so they leave no
    /// barriers behind. If it was their turn, play passes on. With fewer than
    /// two seats left the game ends and the remaining seat, if any, wins.
    ///
    /// Returns `true` when the withdrawal ended the game.
    pub fn withdraw_player(&self, state: &mut GameState, player_id: &PlayerId) -> bool {
        let Some(player) = state.player_mut(player_id) else {
            return false;
        };
        if player.withdrawn {
            return false;
        }
        player.withdrawn = true;
        for token in player.tokens.iter_mut() {
            if let TokenPosition::OnTrack(_) = token.position {
                token.position = TokenPosition::InBase;
            }
        }

        if state.active_player_count() < 2 {
            state.pending_dice = None;
            state.used_dice.clear();
            state.game_over = true;
            state.winner = state
                .players
                .iter()
                .find(|p| !p.withdrawn)
                .map(|p| p.id.clone());
            state.touch();
            return true;
        }

        if self.is_player_turn(state, player_id) {
            self.advance_turn(state);
        } else {
            state.touch();
        }
        false
    }

    /// Has this player brought every token home?
    #[must_use]
    pub fn check_win(&self, player: &Player) -> bool {
        player.finished_tokens as usize == TOKENS_PER_PLAYER
    }

    /// Is it this player's turn?
    #[must_use]
    pub fn is_player_turn(&self, state: &GameState, player_id: &PlayerId) -> bool {
        state
            .current_player()
            .is_some_and(|p| &p.id == player_id)
    }
}
