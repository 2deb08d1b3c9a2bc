//! Terminal front-end.
//!
//! Snapshots are drawn into a plain [`FrameBuffer`] by [`SessionView`] and
//! flushed by [`TerminalRenderer`], which only sends what changed since the
//! previous frame. No widget toolkit is involved.

pub mod fb;
pub mod renderer;
pub mod view;

pub use tetris_duo_core as core;
pub use tetris_duo_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{BoardStatus, SessionView, Viewport};
