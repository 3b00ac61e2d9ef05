//! Core types: players, tokens, game state, dice, board configuration.
//!
//! Everything here is plain data plus small queries. Rule decisions live in
//! `rules`; room bookkeeping lives in `room`.

pub mod config;
pub mod dice;
pub mod player;
pub mod state;
pub mod token;

pub use config::{ConfigError, RulesConfig, DIE_FACES, MAX_PLAYERS, MIN_PLAYERS};
pub use dice::{DiceSource, ScriptedDice, SeededDice, SeededDiceState, SystemDice};
pub use player::{Color, Player, PlayerId, TOKENS_PER_PLAYER};
pub use state::{DiceRoll, GameState};
pub use token::{Token, TokenId, TokenPosition};
