//! Player identification, colours, and per-player token storage.
//!
//! ## PlayerId
//!
//! Opaque player identifier handed to the engine by the transport layer.
//!
//! ## Color
//!
//! Fixed palette of four board corners. Each colour owns a start cell and a
//! home-entry cell on the shared track (see `RulesConfig`).

use serde::{Deserialize, Serialize};

use super::token::{Token, TokenId, TokenPosition};

/// Number of tokens every player races home.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Opaque player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Board colour.
///
/// Declaration order is clockwise around the board; `index()` is used to look
/// up per-colour cells in `RulesConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Blue,
    Red,
    Green,
}

impl Color {
    /// All colours in clockwise order.
    pub const ALL: [Color; 4] = [Color::Yellow, Color::Blue, Color::Red, Color::Green];

    /// Palette for a two-player game: opposite corners.
    pub const TWO_PLAYER: [Color; 2] = [Color::Yellow, Color::Red];

    /// Index into per-colour tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Yellow => 0,
            Color::Blue => 1,
            Color::Red => 2,
            Color::Green => 3,
        }
    }

    /// Colours handed out for a game with `player_count` players, in seat order.
    ///
    /// Returns `None` outside 2-4 players.
    #[must_use]
    pub fn palette(player_count: usize) -> Option<&'static [Color]> {
        match player_count {
            2 => Some(&Self::TWO_PLAYER),
            3 | 4 => Some(&Self::ALL[..player_count]),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
        };
        f.write_str(name)
    }
}

/// A seated player and their four tokens.
///
/// `finished_tokens` is maintained by the rules engine and always equals the
/// number of tokens in `TokenPosition::Finished`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub color: Color,
    /// Track cell a token lands on when it leaves base.
    pub start_cell: u8,
    /// Last shared-track cell before the private home row.
    pub home_entry_cell: u8,
    pub tokens: [Token; TOKENS_PER_PLAYER],
    pub finished_tokens: u8,
    /// Left the room mid-game; skipped by the turn rotation.
    #[serde(default)]
    pub withdrawn: bool,
}

impl Player {
    /// Create a player with every token in base.
    #[must_use]
    pub fn new(id: PlayerId, color: Color, start_cell: u8, home_entry_cell: u8) -> Self {
        Self {
            id,
            color,
            start_cell,
            home_entry_cell,
            tokens: std::array::from_fn(|i| Token::new(TokenId::new(i as u8))),
            finished_tokens: 0,
            withdrawn: false,
        }
    }

    /// Look up one of this player's tokens.
    #[must_use]
    pub fn token(&self, token_id: TokenId) -> Option<&Token> {
        self.tokens.get(token_id.index())
    }

    /// Mutable token lookup.
    pub fn token_mut(&mut self, token_id: TokenId) -> Option<&mut Token> {
        self.tokens.get_mut(token_id.index())
    }

    /// Number of this player's tokens standing on a track cell.
    #[must_use]
    pub fn tokens_on_cell(&self, cell: u8) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.position == TokenPosition::OnTrack(cell))
            .count()
    }

    /// Recount finished tokens from positions.
    #[must_use]
    pub fn count_finished(&self) -> u8 {
        self.tokens.iter().filter(|t| t.is_finished()).count() as u8
    }
}
