//! Networked play over TCP.
//!
//! The server runs one session per connection and streams its board as text;
//! clients send command tokens back, one per line.
//!
//! # Wire Format
//!
//! Server to client, every push interval: `ROWS` lines of `COLS`
//! space-separated integers (0 empty, 1..=7 piece kinds).
//!
//! Client to server: `LEFT`, `RIGHT`, `DOWN`, `ROTATE`, `SPACE`, `PAUSE`,
//! `RESTART`, newline-terminated. Unknown tokens are ignored.

pub mod client;
pub mod codec;
pub mod config;
pub mod server;

pub use client::{connect, RemoteClient};
pub use codec::{FrameDecoder, RemoteBoard};
pub use config::ServerConfig;
pub use server::run_server;
