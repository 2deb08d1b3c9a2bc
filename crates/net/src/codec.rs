//! Board frame framing and decoding on the receiving side.
//!
//! A frame is exactly `ROWS` lines. The stream carries no other delimiter, so
//! the decoder counts lines; blank lines are skipped.

use tracing::warn;

use tetris_duo_core::{Grid, WireError, WireGrid};
use tetris_duo_types::{COLS, ROWS};

/// Groups incoming lines into frames of `ROWS` lines.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: String,
    lines: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (with or without its terminator). Returns the frame text
    /// once `ROWS` lines have been collected.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        self.buf.push_str(line);
        self.buf.push('\n');
        self.lines += 1;
        if self.lines < ROWS {
            return None;
        }
        self.lines = 0;
        Some(std::mem::take(&mut self.buf))
    }

    /// Lines buffered toward the next frame.
    pub fn pending_lines(&self) -> usize {
        self.lines
    }
}

/// Local mirror of a remote player's grid.
#[derive(Debug, Default)]
pub struct RemoteBoard {
    grid: Grid,
    applied: u64,
    rejected: u64,
}

impl RemoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a frame. On a decode error the previous board is kept.
    pub fn apply(&mut self, frame: &str) -> Result<(), WireError> {
        match self.grid.deserialize(frame) {
            Ok(()) => {
                self.applied += 1;
                Ok(())
            }
            Err(err) => {
                self.rejected += 1;
                warn!(%err, rejected = self.rejected, "rejected board frame");
                Err(err)
            }
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn wire_grid(&self) -> WireGrid {
        let mut out = [[0; COLS]; ROWS];
        self.grid.write_wire_grid(&mut out);
        out
    }

    pub fn frames_applied(&self) -> u64 {
        self.applied
    }

    pub fn rejected_frames(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_duo_types::{Cell, PieceKind};

    #[test]
    fn decoder_emits_every_rows_lines() {
        let mut grid = Grid::new();
        grid.set(4, 19, Cell::Occupied(PieceKind::J));
        let text = grid.serialize();

        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for line in text.lines().chain(text.lines()) {
            if let Some(frame) = decoder.push_line(line) {
                frames.push(frame);
            }
        }
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], text);
        assert_eq!(decoder.pending_lines(), 0);
    }

    #[test]
    fn remote_board_keeps_previous_on_error() {
        let mut source = Grid::new();
        source.set(0, 19, Cell::Occupied(PieceKind::I));
        let mut board = RemoteBoard::new();
        board.apply(&source.serialize()).unwrap();

        assert!(board.apply("0 0 zz\n").is_err());
        assert_eq!(board.grid(), &source);
        assert_eq!(board.rejected_frames(), 1);
        assert_eq!(board.frames_applied(), 1);
        assert_eq!(board.wire_grid()[19][0], 1);
    }
}
