//! Rule-violation taxonomy.
//!
//! Every rejected move carries a `MoveErrorCode` from a closed set. Codes are
//! SCREAMING_SNAKE_CASE on the wire and never change meaning.
//!
//! Codes are assigned by priority: turn and identity checks first, then dice
//! bookkeeping, then rule-specific legality, with `MOVE_NOT_LEGAL` as the
//! catch-all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, TokenId};

/// Machine-readable reason a move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveErrorCode {
    NotYourTurn,
    PlayerNotFound,
    TokenNotFound,
    TokenFinished,
    NoPendingDice,
    DiceAlreadyUsed,
    NeedSixToEnter,
    BarrierBlocked,
    CaptureOnSafe,
    OvershootHome,
    InvalidHomeRowEntry,
    MoveNotLegal,
}

impl MoveErrorCode {
    /// Wire string for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            MoveErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            MoveErrorCode::TokenNotFound => "TOKEN_NOT_FOUND",
            MoveErrorCode::TokenFinished => "TOKEN_FINISHED",
            MoveErrorCode::NoPendingDice => "NO_PENDING_DICE",
            MoveErrorCode::DiceAlreadyUsed => "DICE_ALREADY_USED",
            MoveErrorCode::NeedSixToEnter => "NEED_SIX_TO_ENTER",
            MoveErrorCode::BarrierBlocked => "BARRIER_BLOCKED",
            MoveErrorCode::CaptureOnSafe => "CAPTURE_ON_SAFE",
            MoveErrorCode::OvershootHome => "OVERSHOOT_HOME",
            MoveErrorCode::InvalidHomeRowEntry => "INVALID_HOME_ROW_ENTRY",
            MoveErrorCode::MoveNotLegal => "MOVE_NOT_LEGAL",
        }
    }
}

impl std::fmt::Display for MoveErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected move, with enough context for a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("player {0} is not in this game")]
    PlayerNotFound(PlayerId),
    #[error("{0} does not exist")]
    TokenNotFound(TokenId),
    #[error("{0} has already finished")]
    TokenFinished(TokenId),
    #[error("no pending die at index {0}")]
    NoPendingDice(usize),
    #[error("die {0} has already been used this turn")]
    DiceAlreadyUsed(usize),
    #[error("a {needed} is needed to leave base, rolled {rolled}")]
    NeedSixToEnter { needed: u8, rolled: u8 },
    #[error("a barrier blocks the path")]
    BarrierBlocked,
    #[error("an opponent is protected on safe cell {0}")]
    CaptureOnSafe(u8),
    #[error("moving {0} would overshoot home")]
    OvershootHome(u8),
    #[error("home-row position {0} is not a lane")]
    InvalidHomeRowEntry(u8),
    #[error("move is not legal")]
    MoveNotLegal,
}

impl MoveError {
    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> MoveErrorCode {
        match self {
            MoveError::NotYourTurn(_) => MoveErrorCode::NotYourTurn,
            MoveError::PlayerNotFound(_) => MoveErrorCode::PlayerNotFound,
            MoveError::TokenNotFound(_) => MoveErrorCode::TokenNotFound,
            MoveError::TokenFinished(_) => MoveErrorCode::TokenFinished,
            MoveError::NoPendingDice(_) => MoveErrorCode::NoPendingDice,
            MoveError::DiceAlreadyUsed(_) => MoveErrorCode::DiceAlreadyUsed,
            MoveError::NeedSixToEnter { .. } => MoveErrorCode::NeedSixToEnter,
            MoveError::BarrierBlocked => MoveErrorCode::BarrierBlocked,
            MoveError::CaptureOnSafe(_) => MoveErrorCode::CaptureOnSafe,
            MoveError::OvershootHome(_) => MoveErrorCode::OvershootHome,
            MoveError::InvalidHomeRowEntry(_) => MoveErrorCode::InvalidHomeRowEntry,
            MoveError::MoveNotLegal => MoveErrorCode::MoveNotLegal,
        }
    }
}

/// Why a game could not be set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a game needs 2 to 4 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("player {0} is listed twice")]
    DuplicatePlayer(PlayerId),
}
