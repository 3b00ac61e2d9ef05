//! Initial game state for a freshly started room.

use rustc_hash::FxHashSet;

use crate::core::{Color, GameState, Player, PlayerId, RulesConfig};

use super::error::SetupError;

/// Builds the starting `GameState` for an ordered list of players.
///
/// Seat order is list order. Two players sit on opposite corners
/// (yellow, red); three or four take yellow, blue, red, green in turn.
#[derive(Clone, Debug)]
pub struct GameStateFactory {
    config: RulesConfig,
}

impl GameStateFactory {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Board configuration used for start and home-entry cells.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Create the initial state: every token in base, no dice, first seat to act.
    pub fn create_game_state(&self, player_ids: &[PlayerId]) -> Result<GameState, SetupError> {
        let palette = Color::palette(player_ids.len())
            .ok_or(SetupError::InvalidPlayerCount(player_ids.len()))?;

        let mut seen = FxHashSet::default();
        for id in player_ids {
            if !seen.insert(id) {
                return Err(SetupError::DuplicatePlayer(id.clone()));
            }
        }

        let players = player_ids
            .iter()
            .zip(palette)
            .map(|(id, &color)| {
                Player::new(
                    id.clone(),
                    color,
                    self.config.start_cell(color),
                    self.config.home_entry_cell(color),
                )
            })
            .collect();

        Ok(GameState::new(players))
    }
}

impl Default for GameStateFactory {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TokenPosition;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|&n| PlayerId::new(n)).collect()
    }

    #[test]
    fn test_two_player_opposite_colors() {
        let state = GameStateFactory::default()
            .create_game_state(&ids(&["a", "b"]))
            .unwrap();

        assert_eq!(state.players[0].color, Color::Yellow);
        assert_eq!(state.players[0].start_cell, 5);
        assert_eq!(state.players[1].color, Color::Red);
        assert_eq!(state.players[1].start_cell, 39);
        assert_eq!(state.players[1].home_entry_cell, 34);
    }

    #[test]
    fn test_four_player_palette_in_order() {
        let state = GameStateFactory::default()
            .create_game_state(&ids(&["a", "b", "c", "d"]))
            .unwrap();

        let colors: Vec<_> = state.players.iter().map(|p| p.color).collect();
        assert_eq!(colors, Color::ALL.to_vec());
        assert_eq!(state.players[3].start_cell, 56);
    }

    #[test]
    fn test_three_players() {
        let state = GameStateFactory::default()
            .create_game_state(&ids(&["a", "b", "c"]))
            .unwrap();

        let colors: Vec<_> = state.players.iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![Color::Yellow, Color::Blue, Color::Red]);
    }

    #[test]
    fn test_initial_state() {
        let state = GameStateFactory::default()
            .create_game_state(&ids(&["a", "b"]))
            .unwrap();

        assert!(!state.game_started);
        assert!(state.pending_dice.is_none());
        assert_eq!(state.current_player_index, 0);
        for player in &state.players {
            assert_eq!(player.finished_tokens, 0);
            assert!(player.tokens.iter().all(|t| t.position == TokenPosition::InBase));
        }
    }

    #[test]
    fn test_rejects_bad_counts() {
        let factory = GameStateFactory::default();

        assert_eq!(
            factory.create_game_state(&ids(&["solo"])),
            Err(SetupError::InvalidPlayerCount(1))
        );
        assert_eq!(
            factory.create_game_state(&ids(&["a", "b", "c", "d", "e"])),
            Err(SetupError::InvalidPlayerCount(5))
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let factory = GameStateFactory::default();

        assert_eq!(
            factory.create_game_state(&ids(&["a", "b", "a"])),
            Err(SetupError::DuplicatePlayer(PlayerId::new("a")))
        );
    }
}
