//! Read-only copies of session state for renderers and observers.

use crate::grid::WireGrid;
use crate::piece::CellList;
use crate::types::{PieceKind, COLS, ROWS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    /// Absolute (x, y) cells, some of which may lie above the grid.
    pub cells: CellList,
}

impl ActiveSnapshot {
    /// Cells shifted down to the given landing row.
    pub fn cells_at_row(&self, y: i32) -> CellList {
        let dy = y - self.y;
        self.cells.iter().map(|&(cx, cy)| (cx, cy + dy)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Settled cells in wire values (0 empty).
    pub board: WireGrid,
    pub active: Option<ActiveSnapshot>,
    /// Row the active piece would land on.
    pub ghost_y: Option<i32>,
    pub score: u32,
    pub lines: u32,
    pub pieces_locked: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: [[0; COLS]; ROWS],
            active: None,
            ghost_y: None,
            score: 0,
            lines: 0,
            pieces_locked: 0,
            paused: false,
            game_over: false,
        }
    }
}

impl SessionSnapshot {
    /// Cells of the landing preview, if there is an active piece.
    pub fn ghost_cells(&self) -> Option<CellList> {
        let active = self.active.as_ref()?;
        Some(active.cells_at_row(self.ghost_y?))
    }
}
