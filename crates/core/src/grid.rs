//! Grid module - the playfield of settled cells
//!
//! The grid is `ROWS` x `COLS`. Coordinates are (x, y) with x growing to the
//! right and y growing downward; row 0 is the top. The area above row 0 is
//! open: a piece cell with `y < 0` never collides with anything.
//!
//! The grid also owns the board wire format: `ROWS` newline-terminated lines
//! of `COLS` space-separated integers, 0 meaning empty.

use std::fmt::Write as _;

use crate::error::{GridError, WireError};
use crate::piece::Piece;
use crate::types::{Cell, COLS, ROWS};

/// Cell storage, row-major.
pub type Rows = [[Cell; COLS]; ROWS];

/// Board in its wire values.
pub type WireGrid = [[u8; COLS]; ROWS];

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Rows,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    pub fn width(&self) -> usize {
        COLS
    }

    pub fn height(&self) -> usize {
        ROWS
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || x >= COLS as i32 || y < 0 || y >= ROWS as i32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Cell at (x, y), `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.cells[y][x])
    }

    /// Set the cell at (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.cells[y][x] = cell;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &Rows {
        &self.cells
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells
            .get(y)
            .is_some_and(|row| row.iter().all(|c| c.is_occupied()))
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells = [[Cell::Empty; COLS]; ROWS];
    }

    /// Would `piece`, translated by (dx, dy), hit a wall, the floor or a
    /// settled cell?
    ///
    /// Cells above the top edge only collide with the side walls.
    pub fn check_collision(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells_at(dx, dy).into_iter().any(|(x, y)| {
            if x < 0 || x >= COLS as i32 || y >= ROWS as i32 {
                return true;
            }
            y >= 0 && self.cells[y as usize][x as usize].is_occupied()
        })
    }

    /// Write the piece's cells into the grid.
    ///
    /// Fails without writing anything if any cell is out of bounds (including
    /// above the top edge) or already occupied.
    pub fn merge(&mut self, piece: &Piece) -> Result<(), GridError> {
        let cells = piece.cells();
        for &(x, y) in &cells {
            match self.get(x, y) {
                None => return Err(GridError::OutOfBounds { x, y }),
                Some(cell) if cell.is_occupied() => return Err(GridError::Occupied { x, y }),
                Some(_) => {}
            }
        }

        let filled = Cell::Occupied(piece.kind);
        for (x, y) in cells {
            self.cells[y as usize][x as usize] = filled;
        }
        Ok(())
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Scans from the bottom. A full row is removed by shifting everything
    /// above it down one row and blanking row 0, then the same index is
    /// examined again since it now holds the row from above.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = ROWS;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.cells.copy_within(0..row, 1);
                self.cells[0] = [Cell::Empty; COLS];
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Rows the piece can still fall before it would collide.
    pub fn drop_distance(&self, piece: &Piece) -> u32 {
        // Every shape has a filled cell, so the floor always ends this loop.
        let mut distance = 0;
        while !self.check_collision(piece, 0, distance + 1) {
            distance += 1;
        }
        distance as u32
    }

    /// Encode as wire text.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(ROWS * (COLS * 2 + 1));
        self.write_serialized(&mut out);
        out
    }

    /// Append the wire text to `out`.
    pub fn write_serialized(&self, out: &mut String) {
        for row in &self.cells {
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{}", cell.wire_value());
            }
            out.push('\n');
        }
    }

    /// Copy wire values into a plain byte grid.
    pub fn write_wire_grid(&self, out: &mut WireGrid) {
        for (dst, src) in out.iter_mut().zip(self.cells.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = s.wire_value();
            }
        }
    }

    /// Overwrite cells from wire text.
    ///
    /// Lines beyond `ROWS` and tokens beyond `COLS` are ignored; cells with no
    /// token keep their current value. Any token that is not an integer in
    /// 0..=255 rejects the whole frame and leaves the grid unchanged.
    pub fn deserialize(&mut self, text: &str) -> Result<(), WireError> {
        let mut staged = self.cells;
        for (row, line) in text.lines().take(ROWS).enumerate() {
            for (col, token) in line.split_whitespace().take(COLS).enumerate() {
                let value: i64 = token.parse().map_err(|_| WireError::InvalidToken {
                    row,
                    col,
                    token: token.to_string(),
                })?;
                let value =
                    u8::try_from(value).map_err(|_| WireError::OutOfRange { row, col, value })?;
                staged[row][col] = Cell::from_wire(value);
            }
        }
        self.cells = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(grid: &mut Grid, y: i32) {
        for x in 0..COLS as i32 {
            grid.set(x, y, Cell::Occupied(PieceKind::O));
        }
    }

    #[test]
    fn collision_respects_walls_and_floor() {
        let grid = Grid::new();
        let piece = Piece::new(PieceKind::O, 0, 0);
        assert!(!grid.check_collision(&piece, 0, 0));
        assert!(grid.check_collision(&piece, -1, 0));
        assert!(grid.check_collision(&piece, 9, 0));
        assert!(grid.check_collision(&piece, 0, 19));
        assert!(!grid.check_collision(&piece, 0, 18));
    }

    #[test]
    fn cells_above_the_top_are_free() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 0);
        let piece = Piece::new(PieceKind::I, 3, -1);
        assert!(!grid.check_collision(&piece, 0, 0));
        assert!(grid.check_collision(&piece, 0, 1));
    }

    #[test]
    fn merge_rejects_overlap_without_writing() {
        let mut grid = Grid::new();
        grid.set(5, 19, Cell::Occupied(PieceKind::T));
        let before = grid.clone();
        let piece = Piece::new(PieceKind::I, 3, 19);
        assert_eq!(grid.merge(&piece), Err(GridError::Occupied { x: 5, y: 19 }));
        assert_eq!(grid, before);
    }

    #[test]
    fn merge_rejects_cells_above_top() {
        let mut grid = Grid::new();
        let piece = Piece::new(PieceKind::O, 4, -1);
        assert!(matches!(grid.merge(&piece), Err(GridError::OutOfBounds { .. })));
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn clear_lines_handles_adjacent_full_rows() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 18);
        fill_row(&mut grid, 19);
        grid.set(0, 17, Cell::Occupied(PieceKind::L));
        assert_eq!(grid.clear_lines(), 2);
        assert_eq!(grid.get(0, 19), Some(Cell::Occupied(PieceKind::L)));
        assert!((0..19).all(|y| grid.rows()[y].iter().all(|c| c.is_empty())));
    }

    #[test]
    fn clear_lines_on_full_top_row_terminates() {
        let mut grid = Grid::new();
        for y in 0..ROWS as i32 {
            fill_row(&mut grid, y);
        }
        assert_eq!(grid.clear_lines(), ROWS);
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn drop_distance_lands_on_stack() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 19);
        let piece = Piece::spawn(PieceKind::O);
        assert_eq!(grid.drop_distance(&piece), 17);
    }

    #[test]
    fn serialize_format() {
        let mut grid = Grid::new();
        grid.set(0, 0, Cell::Occupied(PieceKind::I));
        let text = grid.serialize();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS);
        assert_eq!(lines[0], "1 0 0 0 0 0 0 0 0 0");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn deserialize_rejects_bad_token_atomically() {
        let mut grid = Grid::new();
        grid.set(2, 2, Cell::Occupied(PieceKind::S));
        let before = grid.clone();
        let err = grid.deserialize("1 1 1\n0 x 0\n").unwrap_err();
        assert!(matches!(err, WireError::InvalidToken { row: 1, col: 1, .. }));
        assert_eq!(grid, before);

        let err = grid.deserialize("256\n").unwrap_err();
        assert_eq!(err, WireError::OutOfRange { row: 0, col: 0, value: 256 });
        assert_eq!(grid, before);
    }

    #[test]
    fn deserialize_short_input_keeps_rest() {
        let mut grid = Grid::new();
        grid.set(9, 19, Cell::Occupied(PieceKind::Z));
        grid.deserialize("3 9\n").unwrap();
        assert_eq!(grid.get(0, 0), Some(Cell::Occupied(PieceKind::T)));
        assert_eq!(grid.get(1, 0).map(Cell::wire_value), Some(9));
        assert_eq!(grid.get(9, 19), Some(Cell::Occupied(PieceKind::Z)));
    }
}
