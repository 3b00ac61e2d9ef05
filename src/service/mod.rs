//! Orchestration on top of the rules engine and room registry.
//!
//! - `GameService`: start / roll / move / pass for a room, single-threaded
//! - `SharedGameService`: the same behind a lock for threaded hosts
//! - `Reply`: JSON envelope for handing results to a transport

pub mod game;
pub mod reply;
pub mod shared;

pub use game::{GameService, MoveOutcome, PassOutcome, RollOutcome, ServiceError};
pub use reply::Reply;
pub use shared::SharedGameService;
