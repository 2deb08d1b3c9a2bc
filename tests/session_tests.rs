//! Session tests - command handling, gravity, locking, scoring, game over

use std::time::Duration;

use tetris_duo::core::{Piece, PieceSource, Session, SessionState};
use tetris_duo::types::{Cell, Command, GameConfig, PieceKind, COLS};

fn session_with(kinds: &[PieceKind]) -> Session {
    Session::new(&GameConfig::default(), PieceSource::sequence(kinds.to_vec()))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_hard_drop_i_piece_on_empty_grid() {
    let mut s = session_with(&[PieceKind::I]);
    assert!(s.set_active(Piece::new(PieceKind::I, 3, 0)));

    assert!(s.apply(Command::HardDrop));

    for x in 3..=6 {
        assert_eq!(s.grid().get(x, 19), Some(Cell::Occupied(PieceKind::I)));
    }
    assert_eq!(s.grid().get(2, 19), Some(Cell::Empty));
    assert_eq!(s.grid().get(7, 19), Some(Cell::Empty));
    assert_eq!(s.lines(), 0);
    assert_eq!(s.score(), 0);
    assert_eq!(s.pieces_locked(), 1);
}

#[test]
fn test_o_piece_completes_bottom_row() {
    let mut s = session_with(&[PieceKind::T]);
    for x in 0..8 {
        s.grid_mut().set(x, 19, Cell::Occupied(PieceKind::J));
    }
    assert!(s.set_active(Piece::new(PieceKind::O, 8, 0)));

    s.apply(Command::HardDrop);

    assert_eq!(s.lines(), 1);
    assert_eq!(s.score(), 15);
    // The top half of the O fell into the cleared row.
    assert_eq!(s.grid().get(8, 19), Some(Cell::Occupied(PieceKind::O)));
    assert_eq!(s.grid().get(9, 19), Some(Cell::Occupied(PieceKind::O)));
    assert_eq!(s.grid().get(0, 19), Some(Cell::Empty));
}

#[test]
fn test_spawn_collision_ends_game_and_freezes_commands() {
    let mut s = session_with(&[PieceKind::O]);
    // Park the current piece away from the spawn area, then block spawn.
    assert!(s.set_active(Piece::new(PieceKind::O, 0, 10)));
    for x in 2..COLS as i32 {
        s.grid_mut().set(x, 1, Cell::Occupied(PieceKind::Z));
    }
    s.apply(Command::HardDrop);
    assert!(s.is_game_over());
    assert_eq!(s.state(), SessionState::GameOver);

    let frozen = *s.active().unwrap();
    let board = s.serialize_board();
    for cmd in [
        Command::Left,
        Command::Right,
        Command::Down,
        Command::Rotate,
        Command::HardDrop,
        Command::Pause,
    ] {
        assert!(!s.apply(cmd));
    }
    assert!(!s.tick(Duration::from_secs(2)));
    assert_eq!(*s.active().unwrap(), frozen);
    assert_eq!(s.serialize_board(), board);
    assert!(!s.is_paused());

    assert!(s.apply(Command::Restart));
    assert_eq!(s.state(), SessionState::Active);
    assert_eq!(s.score(), 0);
    assert!(s.grid().rows().iter().flatten().all(|c| c.is_empty()));
}

#[test]
fn test_rotation_blocked_at_floor_reverts() {
    let mut s = session_with(&[PieceKind::I]);
    assert!(s.set_active(Piece::new(PieceKind::I, 6, 17)));
    s.grid_mut().set(6, 19, Cell::Occupied(PieceKind::O));

    // Vertical I would occupy rows 17..=20.
    assert!(!s.apply(Command::Rotate));
    let piece = s.active().unwrap();
    assert_eq!((piece.width(), piece.height()), (4, 1));
}

#[test]
fn test_moves_blocked_by_walls() {
    let mut s = session_with(&[PieceKind::O]);
    for _ in 0..10 {
        s.apply(Command::Left);
    }
    assert_eq!(s.active().unwrap().x, 0);
    assert!(!s.apply(Command::Left));
    for _ in 0..10 {
        s.apply(Command::Right);
    }
    assert_eq!(s.active().unwrap().x, 8);
}

#[test]
fn test_gravity_steps_every_interval() {
    let mut s = session_with(&[PieceKind::T]);
    for _ in 0..31 {
        s.tick(ms(16));
    }
    assert_eq!(s.active().unwrap().y, 0);
    s.tick(ms(16));
    assert_eq!(s.active().unwrap().y, 1);
}

#[test]
fn test_lock_delay_then_lock() {
    let mut s = session_with(&[PieceKind::O]);
    assert!(s.set_active(Piece::new(PieceKind::O, 4, 18)));

    assert!(!s.tick(ms(500)));
    assert_eq!(s.lock_timer(), Some(Duration::ZERO));
    assert_eq!(s.pieces_locked(), 0);

    s.tick(ms(60));
    assert_eq!(s.pieces_locked(), 0);
    assert!(s.tick(ms(40)));
    assert_eq!(s.pieces_locked(), 1);
    assert_eq!(s.lock_timer(), None);
    assert_eq!(s.active().unwrap().y, 0);
}

#[test]
fn test_pause_suppresses_ticks() {
    let mut s = session_with(&[PieceKind::T]);
    s.apply(Command::Pause);
    assert_eq!(s.state(), SessionState::Paused);
    s.tick(Duration::from_secs(3));
    assert_eq!(s.active().unwrap().y, 0);
    s.apply(Command::Pause);
    s.tick(ms(500));
    assert_eq!(s.active().unwrap().y, 1);
}

#[test]
fn test_zero_line_lock_adds_nothing_and_score_only_grows() {
    let mut s = Session::with_seed(&GameConfig::default(), 99);
    let mut last = 0;
    for i in 0..200 {
        let cmd = [Command::Left, Command::Right, Command::Rotate, Command::HardDrop][i % 4];
        s.apply(cmd);
        if s.is_game_over() {
            break;
        }
        assert!(s.score() >= last);
        assert_eq!(s.score(), s.lines() * 15);
        last = s.score();
    }
}

#[test]
fn test_same_seed_same_game() {
    let config = GameConfig::default();
    let mut a = Session::with_seed(&config, 7);
    let mut b = Session::with_seed(&config, 7);
    for i in 0..60 {
        let cmd = if i % 3 == 0 { Command::HardDrop } else { Command::Left };
        a.apply(cmd);
        b.apply(cmd);
        a.tick(ms(16));
        b.tick(ms(16));
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_snapshot_reflects_state() {
    let mut s = session_with(&[PieceKind::I]);
    s.apply(Command::Pause);
    let snap = s.snapshot();
    assert!(snap.paused);
    assert!(!snap.game_over);
    let active = snap.active.unwrap();
    assert_eq!(active.kind, PieceKind::I);
    assert_eq!(active.cells.len(), 4);
    assert_eq!(snap.ghost_y, Some(19));
}
