//! # parcheesi-engine
//!
//! Authoritative rules and turn orchestration for multiplayer Parcheesi
//! (Ludo-style) games on a 68-cell track with four tokens per player.
//!
//! ## Design Principles
//!
//! 1. **Server-Authoritative**: Clients request actions; the engine decides
//!    legality and produces the next state. A rejected action changes nothing.
//!
//! 2. **Injected Randomness**: Dice come from a `DiceSource`. Production uses
//!    `SystemDice`; tests and replays use `SeededDice` or `ScriptedDice`.
//!
//! 3. **Configuration Over Convention**: Track length, safe cells, start and
//!    home-entry cells, entry roll and capture bonus live in `RulesConfig`.
//!
//! ## Modules
//!
//! - `core`: Players, tokens, game state, dice, board configuration
//! - `rules`: `RulesEngine`, `GameStateFactory`, move error taxonomy
//! - `room`: `RoomRegistry` for membership, bindings and per-room games
//! - `service`: `GameService` turn orchestration, `SharedGameService`, `Reply`

pub mod core;
pub mod room;
pub mod rules;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    Color, ConfigError, DiceRoll, DiceSource, GameState, Player, PlayerId, RulesConfig,
    ScriptedDice, SeededDice, SeededDiceState, SystemDice, Token, TokenId, TokenPosition,
    TOKENS_PER_PLAYER,
};

pub use crate::rules::{
    CapturedToken, GameStateFactory, LegalMove, MoveError, MoveErrorCode, MoveResult,
    RulesEngine, SetupError,
};

pub use crate::room::{ConnectionId, JoinOutcome, LeaveOutcome, RoomError, RoomId, RoomRegistry};

pub use crate::service::{
    GameService, MoveOutcome, PassOutcome, Reply, RollOutcome, ServiceError, SharedGameService,
};
