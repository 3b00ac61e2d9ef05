//! Room lifecycle: membership, connection bindings, and each room's game.

pub mod registry;
pub mod types;

pub use registry::{JoinOutcome, LeaveOutcome, RoomError, RoomRegistry};
pub use types::{ConnectionId, Member, Room, RoomId};
