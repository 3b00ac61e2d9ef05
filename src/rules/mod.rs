//! Game rules.
//!
//! - `RulesEngine`: dice, legal-move derivation, move application, turns, wins
//! - `GameStateFactory`: initial per-room state
//! - `MoveErrorCode` / `MoveError`: the closed rejection taxonomy
//!
//! Nothing here knows about rooms or connections; every function works on the
//! `GameState` it is given.

pub mod engine;
pub mod error;
pub mod factory;
pub mod moves;

pub use engine::RulesEngine;
pub use error::{MoveError, MoveErrorCode, SetupError};
pub use factory::GameStateFactory;
pub use moves::{CapturedToken, Destination, LegalMove, MoveResult};
