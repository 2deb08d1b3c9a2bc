//! Session runner - timing and thread ownership around the core rules.
//!
//! - [`SessionHandle`]: `Arc<Mutex<Session>>` with whole-operation locking
//! - [`SessionRunner`] / [`RunnerHandle`]: a worker thread per session that
//!   applies queued commands and ticks every frame
//! - [`Duel`]: two independent runners for local two-player play

pub mod duel;
pub mod handle;
pub mod runner;

pub use duel::Duel;
pub use handle::SessionHandle;
pub use runner::{RunnerHandle, SessionRunner};
