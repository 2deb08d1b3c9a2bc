//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of a single game and nothing else. It does no
//! I/O, spawns no threads, and reads no clocks: time only enters through
//! [`Session::tick`]'s `elapsed` argument, so a fixed seed and a fixed tick
//! sequence always produce the same game.
//!
//! # Module Structure
//!
//! - [`piece`]: shape matrices, spawn position, clockwise rotation
//! - [`grid`]: 20x10 playfield, collision, merge, line clearing, wire format
//! - [`session`]: active piece, gravity, lock delay, scoring, pause, restart
//! - [`rng`]: where piece kinds come from (seeded uniform or fixed sequence)
//! - [`snapshot`]: read-only copies for renderers
//!
//! # Rules
//!
//! - **Spawn**: row 0, horizontally centered; a spawn that collides ends the game
//! - **Rotation**: 90° clockwise, reverted if blocked (no wall kicks)
//! - **Gravity**: one row every 500ms
//! - **Lock Delay**: 100ms once a gravity step finds the piece grounded
//! - **Scoring**: 15 points per cleared line
//!
//! # Example
//!
//! ```
//! use tetris_duo_core::{PieceSource, Session};
//! use tetris_duo_types::{Command, GameConfig, PieceKind};
//!
//! let config = GameConfig::default();
//! let mut session = Session::new(&config, PieceSource::sequence([PieceKind::O]));
//!
//! session.apply(Command::Left);
//! session.apply(Command::HardDrop);
//!
//! assert_eq!(session.pieces_locked(), 1);
//! assert_eq!(session.score(), 0);
//! ```

pub mod error;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use tetris_duo_types as types;

pub use error::{GridError, WireError};
pub use grid::{Grid, WireGrid};
pub use piece::{CellList, Piece, Shape};
pub use rng::PieceSource;
pub use session::{Session, SessionState};
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
