//! Terminal input mapping.
//!
//! Turns `crossterm` key events into [`Command`](crate::types::Command)s for
//! one player, or `(Player, Command)` pairs when two players share a keyboard.

pub mod map;

pub use tetris_duo_types as types;

pub use map::{handle_duel_key_event, handle_key_event, should_quit, DuelCommands};
