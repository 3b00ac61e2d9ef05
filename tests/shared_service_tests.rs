//! `SharedGameService` under concurrent callers.

mod common;

use std::sync::Barrier;
use std::thread;

use common::{init_logging, pid};
use parcheesi_engine::{
    ConnectionId, GameService, RoomId, RulesConfig, SeededDice, ServiceError, SharedGameService,
};

fn shared() -> SharedGameService<SeededDice> {
    init_logging();
    let service = GameService::from_config(RulesConfig::default(), SeededDice::new(2024))
        .expect("default config is valid");
    SharedGameService::new(service)
}

#[test]
fn test_parallel_rooms() {
    let service = shared();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || {
                let room = RoomId::new(format!("room-{i}"));
                service
                    .join_room(&room, ConnectionId::new(format!("a-{i}")), pid("alice"), None)
                    .unwrap();
                let joined = service
                    .join_room(&room, ConnectionId::new(format!("b-{i}")), pid("bob"), None)
                    .unwrap();
                assert!(joined.should_auto_start);
                service.start_game(&room).unwrap();
                service.roll_dice(&room, &pid("alice")).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.with(|svc| svc.registry().room_count()), 8);
}

#[test]
fn test_racing_rolls_apply_once() {
    let service = shared();
    let room = RoomId::new("contested");
    service
        .join_room(&room, ConnectionId::new("a"), pid("alice"), None)
        .unwrap();
    service
        .join_room(&room, ConnectionId::new("b"), pid("bob"), None)
        .unwrap();
    service.start_game(&room).unwrap();

    let barrier = std::sync::Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let barrier = barrier.clone();
            let room = room.clone();
            thread::spawn(move || {
                barrier.wait();
                service.roll_dice(&room, &pid("alice"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(
            err,
            ServiceError::DiceAlreadyRolled | ServiceError::NotYourTurn(_)
        ));
    }
}

#[test]
fn test_racing_joins_fill_room_once() {
    let service = shared();
    let room = RoomId::new("crowded");

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let service = service.clone();
            let room = room.clone();
            thread::spawn(move || {
                service.join_room(&room, ConnectionId::new(format!("c-{i}")), pid(&format!("p{i}")), Some(4))
            })
        })
        .collect();

    let joined = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(joined, 4);
    assert_eq!(
        service.with(|svc| svc.registry().room(&room).map(|r| r.members.len())),
        Some(4)
    );
}
