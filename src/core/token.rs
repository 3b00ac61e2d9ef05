//! Tokens and their tagged board position.
//!
//! A token moves strictly forward through
//! `InBase -> OnTrack -> InHomeRow -> Finished`. The only backward transition
//! is a capture, which sends an `OnTrack` token back to `InBase`.

use serde::{Deserialize, Serialize};

/// Token identifier, unique within its owning player (0-3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u8);

impl TokenId {
    /// Create a new token ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Index into the owning player's token array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {}", self.0)
    }
}

/// Where a token currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TokenPosition {
    /// Waiting in the player's base.
    InBase,
    /// On a shared track cell, `1..=track_length`.
    OnTrack(u8),
    /// In the owner's private home row, `1..home_row_depth`.
    InHomeRow(u8),
    /// Reached the end of the home row. Terminal.
    Finished,
}

impl TokenPosition {
    /// Track cell, if the token is on the shared track.
    #[must_use]
    pub const fn track_cell(self) -> Option<u8> {
        match self {
            TokenPosition::OnTrack(cell) => Some(cell),
            _ => None,
        }
    }

    /// Home-row lane index, if the token is in its home row.
    #[must_use]
    pub const fn home_row_position(self) -> Option<u8> {
        match self {
            TokenPosition::InHomeRow(pos) => Some(pos),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPosition::InBase => f.write_str("base"),
            TokenPosition::OnTrack(cell) => write!(f, "cell {cell}"),
            TokenPosition::InHomeRow(pos) => write!(f, "home row {pos}"),
            TokenPosition::Finished => f.write_str("finished"),
        }
    }
}

/// A single racing token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub position: TokenPosition,
}

impl Token {
    /// Create a token in base.
    #[must_use]
    pub const fn new(id: TokenId) -> Self {
        Self {
            id,
            position: TokenPosition::InBase,
        }
    }

    #[must_use]
    pub fn is_in_base(&self) -> bool {
        self.position == TokenPosition::InBase
    }

    #[must_use]
    pub fn in_home_row(&self) -> bool {
        matches!(self.position, TokenPosition::InHomeRow(_))
    }

    #[must_use]
    pub fn home_row_position(&self) -> Option<u8> {
        self.position.home_row_position()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position == TokenPosition::Finished
    }
}
