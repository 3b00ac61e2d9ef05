//! Move descriptors: what a die can do, and what a move did.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, TokenId, TokenPosition};

/// Where a token ends up for one die value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub position: TokenPosition,
    /// An opponent stands on a non-safe destination cell.
    pub captures_possible: bool,
    /// The move leaves the shared track for the home row.
    pub enters_home_row: bool,
}

impl Destination {
    #[must_use]
    pub fn is_finish(&self) -> bool {
        self.position == TokenPosition::Finished
    }
}

/// A legal (token, die) pairing for the current roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMove {
    pub token_id: TokenId,
    pub dice_index: usize,
    pub dice_value: u8,
    pub new_position: TokenPosition,
    pub captures_possible: bool,
    pub is_finish: bool,
    pub enters_home_row: bool,
    pub home_row_position: Option<u8>,
}

impl LegalMove {
    pub(crate) fn new(token_id: TokenId, dice_index: usize, dice_value: u8, dest: Destination) -> Self {
        Self {
            token_id,
            dice_index,
            dice_value,
            new_position: dest.position,
            captures_possible: dest.captures_possible,
            is_finish: dest.is_finish(),
            enters_home_row: dest.enters_home_row,
            home_row_position: dest.position.home_row_position(),
        }
    }
}

/// A token sent back to base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedToken {
    pub player_id: PlayerId,
    pub token_id: TokenId,
    /// Track cell the token was taken from.
    pub cell: u8,
}

/// Outcome of a successful move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub token_id: TokenId,
    pub dice_index: usize,
    pub old_position: TokenPosition,
    pub new_position: TokenPosition,
    pub finished: bool,
    pub all_dice_used: bool,
    pub captured_tokens: Vec<CapturedToken>,
    /// Zero unless at least one token was captured.
    pub capture_bonus: u32,
    pub entered_home_row: bool,
}
