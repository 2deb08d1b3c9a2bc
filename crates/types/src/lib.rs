//! Shared data types and constants for the falling-block game.
//!
//! Everything in here is plain data: the fixed board dimensions, the seven
//! tetromino kinds and their base shapes, the tagged board [`Cell`], the
//! normalized [`Command`] vocabulary, and the immutable [`GameConfig`] that
//! is built once at startup and handed to every session by reference.
//!
//! # Board Dimensions
//!
//! - **Columns**: 10 (x = 0..9, left to right)
//! - **Rows**: 20 (y = 0..19, top to bottom)
//!
//! # Timing Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_INTERVAL_MS` | 500 | One gravity step per interval |
//! | `LOCK_DELAY_MS` | 100 | Grace period once a piece is grounded |
//! | `FRAME_MS` | 16 | Runner tick cadence (~60 FPS) |
//! | `PUSH_INTERVAL_MS` | 33 | Network board push cadence (~30 Hz) |
//!
//! # Examples
//!
//! ```
//! use tetris_duo_types::{Cell, Command, PieceKind, COLS, ROWS};
//!
//! assert_eq!((ROWS, COLS), (20, 10));
//! assert_eq!(Command::parse("SPACE"), Some(Command::HardDrop));
//! assert_eq!(Cell::from_wire(3), Cell::Occupied(PieceKind::T));
//! ```

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

/// Board height in cells.
pub const ROWS: usize = 20;

/// Board width in cells.
pub const COLS: usize = 10;

/// Default gravity interval in milliseconds.
pub const GRAVITY_INTERVAL_MS: u64 = 500;

/// Default lock delay in milliseconds.
pub const LOCK_DELAY_MS: u64 = 100;

/// Default points awarded per cleared line (flat rate, no multi-line bonus).
pub const POINTS_PER_LINE: u32 = 15;

/// Default runner tick cadence in milliseconds.
pub const FRAME_MS: u64 = 16;

/// Default network push cadence in milliseconds.
pub const PUSH_INTERVAL_MS: u64 = 33;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// A base shape: at most 4x4, row-major, `rows x cols` significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeTemplate {
    pub rows: usize,
    pub cols: usize,
    pub cells: [[u8; 4]; 4],
}

const fn template(rows: usize, cols: usize, cells: [[u8; 4]; 4]) -> ShapeTemplate {
    ShapeTemplate { rows, cols, cells }
}

const SHAPES: [ShapeTemplate; 7] = [
    // I
    template(1, 4, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]),
    // O
    template(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    // T
    template(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    // S
    template(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    // Z
    template(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]),
    // J
    template(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    // L
    template(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
];

impl PieceKind {
    /// All kinds in table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Table index (0..=6).
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Value written to the board wire format for a cell of this kind (1..=7).
    pub fn code(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => None,
            c => Self::from_index(c as usize - 1),
        }
    }

    /// The spawn orientation shape of this kind.
    pub fn base_shape(self) -> &'static ShapeTemplate {
        &SHAPES[self.index()]
    }

    /// Upper-case single letter.
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// A cell of the board.
///
/// `Solid` covers occupied values that do not name a piece kind, which can
/// arrive through the wire format from a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(PieceKind),
    Solid(NonZeroU8),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// Decode a wire value: 0 is empty, 1..=7 a piece kind, anything else solid.
    pub fn from_wire(value: u8) -> Self {
        match NonZeroU8::new(value) {
            None => Cell::Empty,
            Some(v) => match PieceKind::from_code(value) {
                Some(kind) => Cell::Occupied(kind),
                None => Cell::Solid(v),
            },
        }
    }

    pub fn wire_value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(kind) => kind.code(),
            Cell::Solid(v) => v.get(),
        }
    }

    /// Piece kind for coloring, if the cell carries one.
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Occupied(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Commands accepted by a session.
///
/// The textual tokens are the ones exchanged with input layers and remote
/// clients: `LEFT`, `RIGHT`, `DOWN`, `ROTATE`, `SPACE`, `PAUSE`, `RESTART`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Shift one column left
    Left,
    /// Shift one column right
    Right,
    /// Soft drop by a single row
    Down,
    /// Rotate 90° clockwise, reverting if blocked
    Rotate,
    /// Drop to the landing row and lock
    HardDrop,
    /// Toggle pause
    Pause,
    /// Start over after game over
    Restart,
}

impl Command {
    /// Parse a wire token. Unknown tokens yield `None` and are meant to be ignored.
    ///
    /// ```
    /// use tetris_duo_types::Command;
    ///
    /// assert_eq!(Command::parse("LEFT"), Some(Command::Left));
    /// assert_eq!(Command::parse(" ROTATE\r"), Some(Command::Rotate));
    /// assert_eq!(Command::parse("left"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "LEFT" => Some(Command::Left),
            "RIGHT" => Some(Command::Right),
            "DOWN" => Some(Command::Down),
            "ROTATE" => Some(Command::Rotate),
            "SPACE" | "HARD_DROP" => Some(Command::HardDrop),
            "PAUSE" => Some(Command::Pause),
            "RESTART" => Some(Command::Restart),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Command::Left => "LEFT",
            Command::Right => "RIGHT",
            Command::Down => "DOWN",
            Command::Rotate => "ROTATE",
            Command::HardDrop => "SPACE",
            Command::Pause => "PAUSE",
            Command::Restart => "RESTART",
        }
    }
}

/// Seat in a two-player match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::One => "PLAYER 1",
            Player::Two => "PLAYER 2",
        }
    }
}

/// Game rules configuration.
///
/// Built once at startup (defaults, optionally overlaid by a JSON file and CLI
/// flags) and passed by reference into every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity_interval_ms: u64,
    /// 0 locks a grounded piece on the gravity step that finds it grounded.
    pub lock_delay_ms: u64,
    pub points_per_line: u32,
    pub frame_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity_interval_ms: GRAVITY_INTERVAL_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            points_per_line: POINTS_PER_LINE,
            frame_ms: FRAME_MS,
        }
    }
}

impl GameConfig {
    pub fn gravity_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.gravity_interval_ms)
    }

    pub fn lock_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.lock_delay_ms)
    }

    pub fn frame(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_matches_constants() {
        let config = GameConfig::default();
        assert_eq!(config.gravity_interval_ms, 500);
        assert_eq!(config.lock_delay_ms, 100);
        assert_eq!(config.points_per_line, 15);
        assert_eq!(config.frame_ms, 16);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"lock_delay_ms":0}"#).unwrap();
        assert_eq!(config.lock_delay_ms, 0);
        assert_eq!(config.gravity_interval_ms, GRAVITY_INTERVAL_MS);
        assert_eq!(config.points_per_line, POINTS_PER_LINE);
    }

    #[test]
    fn piece_codes_are_one_based() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.code() as usize, i + 1);
            assert_eq!(PieceKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn every_base_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            let shape = kind.base_shape();
            let filled: u32 = shape
                .cells
                .iter()
                .take(shape.rows)
                .map(|row| row.iter().take(shape.cols).map(|&v| v as u32).sum::<u32>())
                .sum();
            assert_eq!(filled, 4, "{:?}", kind);
        }
    }

    #[test]
    fn cell_wire_values() {
        assert_eq!(Cell::from_wire(0), Cell::Empty);
        assert_eq!(Cell::from_wire(1), Cell::Occupied(PieceKind::I));
        assert_eq!(Cell::from_wire(7), Cell::Occupied(PieceKind::L));
        assert_eq!(Cell::from_wire(9).wire_value(), 9);
        assert!(Cell::from_wire(9).is_occupied());
        assert_eq!(Cell::from_wire(9).kind(), None);
    }

    #[test]
    fn command_tokens_round_trip() {
        for cmd in [
            Command::Left,
            Command::Right,
            Command::Down,
            Command::Rotate,
            Command::HardDrop,
            Command::Pause,
            Command::Restart,
        ] {
            assert_eq!(Command::parse(cmd.as_token()), Some(cmd));
        }
        assert_eq!(Command::parse("HARD_DROP"), Some(Command::HardDrop));
        assert_eq!(Command::parse("JUMP"), None);
        assert_eq!(Command::parse(""), None);
    }
}
