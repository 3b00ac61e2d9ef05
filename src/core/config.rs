//! Board geometry and rule constants.
//!
//! `RulesConfig` describes the board the engine plays on:
//! - Shared track length and safe cells
//! - Per-colour start and home-entry cells
//! - Home-row depth (the finish threshold)
//! - Entry roll, capture bonus, dice per roll
//!
//! Every field has a default matching the standard 68-cell Parcheesi board, and
//! the struct deserializes with `#[serde(default)]` so a host can override a
//! subset of fields from a JSON or TOML document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::Color;

/// Highest face on a die.
pub const DIE_FACES: u8 = 6;

/// Largest room a game supports.
pub const MAX_PLAYERS: usize = 4;

/// Smallest room a game supports.
pub const MIN_PLAYERS: usize = 2;

/// Invalid board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("track length must be at least {min}, got {got}")]
    TrackTooShort { min: u8, got: u8 },
    #[error("home row depth must be at least 2, got {0}")]
    HomeRowTooShallow(u8),
    #[error("{field} cell {cell} is outside the track 1..={track_length}")]
    CellOutOfRange {
        field: &'static str,
        cell: u8,
        track_length: u8,
    },
    #[error("entry roll must be a die face 1..=6, got {0}")]
    InvalidEntryRoll(u8),
    #[error("at least one die per roll is required")]
    NoDice,
    #[error("default required players must be 2..=4, got {0}")]
    InvalidRequiredPlayers(usize),
}

/// Rules and board configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Number of cells in the shared circuit. Cells are numbered 1..=N.
    pub track_length: u8,

    /// Home-row finish threshold. Lanes are 1..depth; reaching `depth` finishes.
    pub home_row_depth: u8,

    /// Track cells where captures are not allowed.
    pub safe_cells: Vec<u8>,

    /// Entry cell per colour, indexed by `Color::index()`.
    pub start_cells: [u8; 4],

    /// Last shared cell before each colour's home row, indexed by `Color::index()`.
    pub home_entry_cells: [u8; 4],

    /// Die value required to bring a token out of base.
    pub entry_roll: u8,

    /// Reward reported when a move sends at least one opponent back to base.
    pub capture_bonus: u32,

    /// Dice thrown per roll.
    pub dice_per_roll: usize,

    /// Room size used when a joining client doesn't ask for one.
    pub default_required_players: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            track_length: 68,
            home_row_depth: 7,
            safe_cells: vec![5, 12, 17, 22, 29, 34, 39, 46, 51, 56, 63, 68],
            start_cells: [5, 22, 39, 56],
            home_entry_cells: [68, 17, 34, 51],
            entry_roll: 6,
            capture_bonus: 20,
            dice_per_roll: 2,
            default_required_players: 2,
        }
    }
}

impl RulesConfig {
    /// Start cell for a colour.
    #[must_use]
    pub fn start_cell(&self, color: Color) -> u8 {
        self.start_cells[color.index()]
    }

    /// Home-entry cell for a colour.
    #[must_use]
    pub fn home_entry_cell(&self, color: Color) -> u8 {
        self.home_entry_cells[color.index()]
    }

    /// Is this track cell protected from captures?
    #[must_use]
    pub fn is_safe_cell(&self, cell: u8) -> bool {
        self.safe_cells.contains(&cell)
    }

    /// Track cell after `cell`, wrapping N back to 1.
    #[must_use]
    pub fn next_cell(&self, cell: u8) -> u8 {
        if cell >= self.track_length {
            1
        } else {
            cell + 1
        }
    }

    /// Set the entry roll.
    #[must_use]
    pub fn with_entry_roll(mut self, roll: u8) -> Self {
        self.entry_roll = roll;
        self
    }

    /// Set the capture bonus.
    #[must_use]
    pub fn with_capture_bonus(mut self, bonus: u32) -> Self {
        self.capture_bonus = bonus;
        self
    }

    /// Set the home-row depth.
    #[must_use]
    pub fn with_home_row_depth(mut self, depth: u8) -> Self {
        self.home_row_depth = depth;
        self
    }

    /// Replace the safe-cell list.
    #[must_use]
    pub fn with_safe_cells(mut self, cells: Vec<u8>) -> Self {
        self.safe_cells = cells;
        self
    }

    /// Set the default room size.
    #[must_use]
    pub fn with_default_required_players(mut self, count: usize) -> Self {
        self.default_required_players = count;
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Longer than one roll of every die, so a move never laps the board.
        let min_track = (self.dice_per_roll as u32 * DIE_FACES as u32 + 1).min(u8::MAX as u32) as u8;
        if self.track_length < min_track {
            return Err(ConfigError::TrackTooShort {
                min: min_track,
                got: self.track_length,
            });
        }
        if self.home_row_depth < 2 {
            return Err(ConfigError::HomeRowTooShallow(self.home_row_depth));
        }
        if !(1..=DIE_FACES).contains(&self.entry_roll) {
            return Err(ConfigError::InvalidEntryRoll(self.entry_roll));
        }
        if self.dice_per_roll == 0 {
            return Err(ConfigError::NoDice);
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.default_required_players) {
            return Err(ConfigError::InvalidRequiredPlayers(self.default_required_players));
        }

        let fields: [(&'static str, &[u8]); 3] = [
            ("safe", &self.safe_cells),
            ("start", &self.start_cells),
            ("home entry", &self.home_entry_cells),
        ];
        for (field, cells) in fields {
            if let Some(&cell) = cells.iter().find(|&&c| c == 0 || c > self.track_length) {
                return Err(ConfigError::CellOutOfRange {
                    field,
                    cell,
                    track_length: self.track_length,
                });
            }
        }

        Ok(())
    }
}
