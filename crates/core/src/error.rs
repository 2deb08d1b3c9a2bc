//! Error types for grid contract failures and malformed wire input.

use thiserror::Error;

/// A merge was attempted on a piece that does not fit where it stands.
///
/// Merging is only legal after `check_collision` has cleared the position,
/// so either variant means the caller broke that contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("piece cell ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("piece cell ({x}, {y}) overlaps an occupied cell")]
    Occupied { x: i32, y: i32 },
}

/// A board frame could not be decoded. The grid is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("row {row}, column {col}: `{token}` is not an integer")]
    InvalidToken {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("row {row}, column {col}: value {value} is outside 0..=255")]
    OutOfRange { row: usize, col: usize, value: i64 },
}
