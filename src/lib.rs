//! Falling-block puzzle game (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and adds the startup
//! configuration and logging setup shared by the binary.

pub mod config;
pub mod logging;

pub use tetris_duo_core as core;
pub use tetris_duo_input as input;
pub use tetris_duo_net as net;
pub use tetris_duo_runner as runner;
pub use tetris_duo_term as term;
pub use tetris_duo_types as types;
