//! Game state for one room.
//!
//! ## GameState
//!
//! - Seated players in turn order, each with four tokens
//! - Whose turn it is
//! - The pending roll and which of its dice have been spent
//! - Started / over / winner flags
//!
//! The rules engine is the only writer. Transport code reads it (it is
//! `Serialize`) but never mutates tokens directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{Player, PlayerId};
use super::token::{TokenId, TokenPosition};

/// One roll of the dice. Two dice in the standard game.
pub type DiceRoll = SmallVec<[u8; 2]>;

/// Complete state of a game in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Seated players; index is turn order.
    pub players: Vec<Player>,

    /// Index into `players` of whoever acts next.
    pub current_player_index: usize,

    /// Dice rolled this turn. `None` between turns.
    pub pending_dice: Option<DiceRoll>,

    /// Parallel to `pending_dice`: which dice have been spent.
    pub used_dice: Vec<bool>,

    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<PlayerId>,

    /// Stamped on every roll, move, and turn change.
    pub last_action_at: DateTime<Utc>,
}

impl GameState {
    /// Create a not-yet-started state for the given players.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            current_player_index: 0,
            pending_dice: None,
            used_dice: Vec::new(),
            game_started: false,
            game_over: false,
            winner: None,
            last_action_at: Utc::now(),
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // === Players ===

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn player_index(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == player_id)
    }

    /// Look up a player by ID.
    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    /// Seats still in the turn rotation.
    #[must_use]
    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| !p.withdrawn).count()
    }

    /// Mutable player lookup.
    pub fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == player_id)
    }

    // === Board Queries ===

    /// Does any player have two or more tokens on this track cell?
    #[must_use]
    pub fn barrier_at(&self, cell: u8) -> bool {
        self.players.iter().any(|p| p.tokens_on_cell(cell) >= 2)
    }

    /// Does any player other than seat `seat` have a token on this track cell?
    #[must_use]
    pub fn opponent_on(&self, cell: u8, seat: usize) -> bool {
        self.players
            .iter()
            .enumerate()
            .any(|(i, p)| i != seat && p.tokens_on_cell(cell) > 0)
    }

    /// Opponent tokens (owner, token) standing on a track cell.
    pub fn opponent_tokens_on(&self, cell: u8, seat: usize) -> impl Iterator<Item = (usize, TokenId)> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != seat)
            .flat_map(move |(i, p)| {
                p.tokens
                    .iter()
                    .filter(move |t| t.position == TokenPosition::OnTrack(cell))
                    .map(move |t| (i, t.id))
            })
    }

    // === Dice ===

    /// Face value of a pending die.
    #[must_use]
    pub fn pending_die(&self, dice_index: usize) -> Option<u8> {
        self.pending_dice.as_ref()?.get(dice_index).copied()
    }

    /// Indices and values of pending dice not yet spent.
    pub fn unused_dice(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.pending_dice
            .iter()
            .flat_map(|dice| dice.iter().copied().enumerate())
            .filter(|(i, _)| !self.used_dice.get(*i).copied().unwrap_or(true))
    }

    /// Record that something happened now.
    pub fn touch(&mut self) {
        self.last_action_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::Color;
    use smallvec::smallvec;

    fn two_players() -> GameState {
        GameState::new(vec![
            Player::new(PlayerId::new("p1"), Color::Yellow, 5, 68),
            Player::new(PlayerId::new("p2"), Color::Red, 39, 34),
        ])
    }

    #[test]
    fn test_new_state() {
        let state = two_players();

        assert_eq!(state.player_count(), 2);
        assert_eq!(state.current_player_index, 0);
        assert!(state.pending_dice.is_none());
        assert!(state.used_dice.is_empty());
        assert!(!state.game_started);
        assert!(!state.game_over);
        assert_eq!(state.current_player().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn test_player_lookup() {
        let state = two_players();

        assert_eq!(state.player_index(&PlayerId::new("p2")), Some(1));
        assert!(state.player(&PlayerId::new("nobody")).is_none());
    }

    #[test]
    fn test_active_player_count() {
        let mut state = two_players();
        assert_eq!(state.active_player_count(), 2);

        if let Some(p2) = state.player_mut(&PlayerId::new("p2")) {
            p2.withdrawn = true;
        }
        assert!(state.players[1].withdrawn);
        assert_eq!(state.active_player_count(), 1);
        assert!(state.player_mut(&PlayerId::new("nobody")).is_none());
    }

    #[test]
    fn test_barrier_needs_same_owner() {
        let mut state = two_players();
        state.players[0].tokens[0].position = TokenPosition::OnTrack(20);
        state.players[1].tokens[0].position = TokenPosition::OnTrack(20);
        assert!(!state.barrier_at(20));

        state.players[0].tokens[1].position = TokenPosition::OnTrack(20);
        assert!(state.barrier_at(20));
    }

    #[test]
    fn test_opponent_tokens_on() {
        let mut state = two_players();
        state.players[0].tokens[0].position = TokenPosition::OnTrack(10);
        state.players[1].tokens[2].position = TokenPosition::OnTrack(10);

        assert!(state.opponent_on(10, 0));
        assert!(state.opponent_on(10, 1));
        assert!(!state.opponent_on(11, 0));

        let found: Vec<_> = state.opponent_tokens_on(10, 0).collect();
        assert_eq!(found, vec![(1, TokenId::new(2))]);
    }

    #[test]
    fn test_unused_dice() {
        let mut state = two_players();
        assert_eq!(state.unused_dice().count(), 0);

        state.pending_dice = Some(smallvec![6, 2]);
        state.used_dice = vec![true, false];

        let unused: Vec<_> = state.unused_dice().collect();
        assert_eq!(unused, vec![(1, 2)]);
        assert_eq!(state.pending_die(0), Some(6));
        assert_eq!(state.pending_die(2), None);
    }

    #[test]
    fn test_state_serialization_shape() {
        let state = two_players();
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["currentPlayerIndex"], 0);
        assert_eq!(json["players"][1]["startCell"], 39);
        assert!(json["pendingDice"].is_null());
    }
}
