//! Piece module - one falling tetromino
//!
//! A piece is a small 0/1 matrix plus the grid position of its top-left cell.
//! Moving and rotating never look at the grid: legality is decided by
//! [`Grid::check_collision`](crate::grid::Grid::check_collision) before the
//! caller commits a move.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, COLS};

/// Largest side of any shape matrix.
pub const MAX_SHAPE_SIDE: usize = 4;

/// Occupied cells of a shape, at most one per matrix slot.
pub type CellList = ArrayVec<(i32, i32), { MAX_SHAPE_SIDE * MAX_SHAPE_SIDE }>;

/// Rectangular 0/1 matrix, row-major, up to 4x4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Spawn orientation of a piece kind.
    pub fn of(kind: PieceKind) -> Self {
        let t = kind.base_shape();
        Self {
            rows: t.rows,
            cols: t.cols,
            cells: t.cells,
        }
    }

    /// Build a shape from explicit rows.
    ///
    /// Returns `None` unless the rows form a non-empty rectangle no larger than
    /// 4x4 with at least one filled cell.
    pub fn from_rows(rows: &[&[u8]]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height > MAX_SHAPE_SIDE || width == 0 || width > MAX_SHAPE_SIDE {
            return None;
        }
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }

        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = u8::from(v != 0);
            }
        }
        let shape = Self {
            rows: height,
            cols: width,
            cells,
        };
        if shape.filled().is_empty() {
            return None;
        }
        Some(shape)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (row, col), 0 outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row >= self.rows || col >= self.cols {
            return 0;
        }
        self.cells[row][col]
    }

    /// 90° clockwise turn: an R x C matrix becomes C x R with
    /// `new[c][R - 1 - r] = old[r][c]`.
    pub fn rotated(&self) -> Self {
        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for r in 0..self.rows {
            for c in 0..self.cols {
                cells[c][self.rows - 1 - r] = self.cells[r][c];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Filled cells as (col, row) offsets from the top-left corner.
    pub fn filled(&self) -> CellList {
        let mut out = CellList::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cells[r][c] != 0 {
                    out.push((c as i32, r as i32));
                }
            }
        }
        out
    }

    /// The significant rows of the matrix, for display and tests.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| self.cells[r][..self.cols].to_vec())
            .collect()
    }
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    /// Column of the shape's top-left cell (may be out of range transiently).
    pub x: i32,
    /// Row of the shape's top-left cell.
    pub y: i32,
    shape: Shape,
}

impl Piece {
    /// Create a piece of `kind` in its spawn orientation at (x, y).
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self::with_shape(kind, Shape::of(kind), x, y)
    }

    pub fn with_shape(kind: PieceKind, shape: Shape, x: i32, y: i32) -> Self {
        Self { kind, x, y, shape }
    }

    /// Create a piece at the centered start position: row 0,
    /// column `COLS / 2 - width / 2`.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = Shape::of(kind);
        let x = (COLS / 2) as i32 - (shape.cols() / 2) as i32;
        Self::with_shape(kind, shape, x, 0)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.cols()
    }

    pub fn height(&self) -> usize {
        self.shape.rows()
    }

    /// Translate by (dx, dy). No bounds check.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Turn the shape 90° clockwise in place. Position is unchanged.
    pub fn rotate(&mut self) {
        self.shape = self.shape.rotated();
    }

    /// Absolute (x, y) grid coordinates of every filled cell.
    pub fn cells(&self) -> CellList {
        self.cells_at(0, 0)
    }

    /// Absolute coordinates as if the piece stood at (x + dx, y + dy).
    pub fn cells_at(&self, dx: i32, dy: i32) -> CellList {
        self.shape
            .filled()
            .into_iter()
            .map(|(c, r)| (self.x + c + dx, self.y + r + dy))
            .collect()
    }
}
