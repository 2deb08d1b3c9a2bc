//! Runner tests - worker threads, shared handles, duel isolation

use std::thread;
use std::time::{Duration, Instant};

use tetris_duo::core::{PieceSource, Session};
use tetris_duo::runner::{Duel, SessionHandle, SessionRunner};
use tetris_duo::types::{Command, GameConfig, PieceKind, Player};

fn fast_config() -> GameConfig {
    GameConfig {
        gravity_interval_ms: 20,
        lock_delay_ms: 0,
        frame_ms: 2,
        ..GameConfig::default()
    }
}

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    done()
}

#[test]
fn test_runner_applies_queued_commands() {
    let config = GameConfig::default();
    let handle = SessionHandle::new(Session::new(&config, PieceSource::sequence([PieceKind::O])));
    let mut runner = SessionRunner::spawn(handle.clone(), &config).unwrap();

    assert!(runner.send(Command::Left));
    assert!(runner.send(Command::HardDrop));
    assert!(wait_until(Duration::from_secs(2), || handle
        .with(|s| s.pieces_locked())
        == 1));
    assert_eq!(handle.snapshot().board[19][3], PieceKind::O.code());

    runner.stop();
    assert!(!runner.is_running());
    assert!(!runner.send(Command::Left));
}

#[test]
fn test_runner_ticks_gravity() {
    let config = fast_config();
    let handle = SessionHandle::new(Session::new(&config, PieceSource::sequence([PieceKind::I])));
    let _runner = SessionRunner::spawn(handle.clone(), &config).unwrap();

    assert!(wait_until(Duration::from_secs(5), || handle
        .with(|s| s.pieces_locked())
        >= 1));
}

#[test]
fn test_paused_runner_holds_still() {
    let config = fast_config();
    let handle = SessionHandle::new(Session::new(&config, PieceSource::sequence([PieceKind::T])));
    let runner = SessionRunner::spawn(handle.clone(), &config).unwrap();

    runner.send(Command::Pause);
    assert!(wait_until(Duration::from_secs(2), || handle.snapshot().paused));
    let before = handle.snapshot();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(handle.snapshot(), before);
}

#[test]
fn test_duel_sessions_are_independent() {
    let config = GameConfig::default();
    let mut duel = Duel::spawn(
        &config,
        PieceSource::sequence([PieceKind::O]),
        PieceSource::sequence([PieceKind::O]),
    )
    .unwrap();

    duel.send(Player::One, Command::HardDrop);
    assert!(wait_until(Duration::from_secs(2), || duel
        .handle(Player::One)
        .with(|s| s.pieces_locked())
        == 1));

    let [one, two] = duel.snapshots();
    assert_eq!(one.pieces_locked, 1);
    assert_eq!(two.pieces_locked, 0);
    assert!(two.board.iter().flatten().all(|&v| v == 0));

    duel.stop();
}
