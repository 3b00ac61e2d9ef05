#![allow(dead_code)]

//! Shared helpers for integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use parcheesi_engine::{
    ConnectionId, GameService, GameState, PlayerId, RoomId, RulesConfig, ScriptedDice, TokenId,
    TokenPosition,
};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn pid(name: &str) -> PlayerId {
    PlayerId::new(name)
}

/// A service with scripted dice and a started room seating `players` in order.
pub fn started_room(players: &[&str], faces: Vec<u8>) -> (GameService<ScriptedDice>, RoomId) {
    init_logging();

    let mut service = GameService::from_config(RulesConfig::default(), ScriptedDice::new(faces))
        .expect("default config is valid");
    let room = RoomId::new("table-1");
    for (i, name) in players.iter().enumerate() {
        service
            .join_room(
                &room,
                ConnectionId::new(format!("conn-{i}")),
                pid(name),
                Some(players.len()),
            )
            .expect("join");
    }
    service.start_game(&room).expect("start");
    (service, room)
}

/// Overwrite a token's position directly.
pub fn place(state: &mut GameState, seat: usize, token: u8, position: TokenPosition) {
    state.players[seat].tokens[token as usize].position = position;
    state.players[seat].finished_tokens = state.players[seat].count_finished();
}

/// Token handle shorthand.
pub fn tok(index: u8) -> TokenId {
    TokenId::new(index)
}
