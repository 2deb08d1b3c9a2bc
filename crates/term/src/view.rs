//! SessionView: draws session snapshots into a framebuffer.
//!
//! Pure, no I/O. Each board is drawn as a bordered well with a small panel
//! to its right:
//!
//! ```text
//! ┌────────────────────┐  PLAYER 1
//! │· · · ████ · · · · ·│  SCORE
//! │· · · · · · · · · · │  15
//! ...
//! └────────────────────┘
//! ```

use crate::core::{SessionSnapshot, WireGrid};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Cell, PieceKind, Player, COLS, ROWS};

/// Columns reserved right of a board for the panel.
const PANEL_W: u16 = 12;
/// Columns between two boards in duel mode.
const GUTTER: u16 = 2;

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Connection counters shown next to a remote board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStatus {
    pub connected: bool,
    pub frames: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionView {
    /// Terminal columns per grid cell.
    cell_w: u16,
    /// Terminal rows per grid cell.
    cell_h: u16,
}

impl Default for SessionView {
    fn default() -> Self {
        // Two columns per cell keeps blocks roughly square.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl SessionView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Width and height of a bordered well.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            COLS as u16 * self.cell_w + 2,
            ROWS as u16 * self.cell_h + 2,
        )
    }

    fn block_w(&self) -> u16 {
        self.frame_size().0 + 2 + PANEL_W
    }

    fn origin(&self, viewport: Viewport, total_w: u16) -> (u16, u16) {
        let (_, frame_h) = self.frame_size();
        (
            viewport.width.saturating_sub(total_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    /// Render one session, centered.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        prepare(fb, viewport);
        let (x, y) = self.origin(viewport, self.block_w());
        self.draw_session(fb, snap, None, x, y);
    }

    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Render two sessions side by side, player one on the left.
    pub fn render_duel_into(
        &self,
        snaps: &[SessionSnapshot; 2],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        prepare(fb, viewport);
        let block_w = self.block_w();
        let (x, y) = self.origin(viewport, block_w * 2 + GUTTER);
        for player in Player::ALL {
            let bx = x.saturating_add((block_w + GUTTER) * player.index() as u16);
            self.draw_session(fb, &snaps[player.index()], Some(player.label()), bx, y);
        }
    }

    pub fn render_duel(&self, snaps: &[SessionSnapshot; 2], viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_duel_into(snaps, viewport, &mut fb);
        fb
    }

    /// Render a bare grid received from a server.
    pub fn render_board_into(
        &self,
        board: &WireGrid,
        status: BoardStatus,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        prepare(fb, viewport);
        let (x, y) = self.origin(viewport, self.block_w());
        self.draw_well(fb, board, x, y);

        let (frame_w, _) = self.frame_size();
        let px = x.saturating_add(frame_w + 2);
        let (label, value) = panel_styles();
        fb.put_str(px, y, "REMOTE", label);
        fb.put_str(
            px,
            y + 1,
            if status.connected { "online" } else { "offline" },
            value,
        );
        fb.put_str(px, y + 3, "FRAMES", label);
        fb.put_u32(px, y + 4, clamp_u32(status.frames), value);
        fb.put_str(px, y + 6, "REJECTED", label);
        fb.put_u32(px, y + 7, clamp_u32(status.rejected), value);
    }

    pub fn render_board(
        &self,
        board: &WireGrid,
        status: BoardStatus,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_board_into(board, status, viewport, &mut fb);
        fb
    }

    fn draw_session(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        title: Option<&str>,
        x: u16,
        y: u16,
    ) {
        self.draw_well(fb, &snap.board, x, y);

        if !snap.game_over {
            if let Some(ghost) = snap.ghost_cells() {
                let style = Style::plain(Rgb::new(140, 140, 140), WELL_BG).dim();
                for (cx, cy) in ghost {
                    self.fill_grid_cell(fb, x, y, cx, cy, '░', style);
                }
            }
        }
        if let Some(active) = &snap.active {
            for &(cx, cy) in &active.cells {
                self.fill_grid_cell(fb, x, y, cx, cy, '█', block_style(Some(active.kind)));
            }
        }

        self.draw_panel(fb, snap, title, x, y);

        let overlay = if snap.game_over {
            Some("GAME OVER")
        } else if snap.paused {
            Some("PAUSED")
        } else {
            None
        };
        if let Some(text) = overlay {
            self.draw_overlay(fb, x, y, text);
        }
    }

    fn draw_well(&self, fb: &mut FrameBuffer, board: &WireGrid, x: u16, y: u16) {
        let (frame_w, frame_h) = self.frame_size();
        draw_border(fb, x, y, frame_w, frame_h, Style::default());

        let empty = Style::plain(Rgb::new(90, 90, 100), WELL_BG).dim();
        for (gy, row) in board.iter().enumerate() {
            for (gx, &value) in row.iter().enumerate() {
                let (ch, style) = match Cell::from_wire(value) {
                    Cell::Empty => ('·', empty),
                    cell => ('█', block_style(cell.kind())),
                };
                self.fill_grid_cell(fb, x, y, gx as i32, gy as i32, ch, style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_grid_cell(
        &self,
        fb: &mut FrameBuffer,
        origin_x: u16,
        origin_y: u16,
        cx: i32,
        cy: i32,
        ch: char,
        style: Style,
    ) {
        // Cells above the well are not drawn.
        if cx < 0 || cx >= COLS as i32 || cy < 0 || cy >= ROWS as i32 {
            return;
        }
        let px = origin_x + 1 + cx as u16 * self.cell_w;
        let py = origin_y + 1 + cy as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        title: Option<&str>,
        x: u16,
        y: u16,
    ) {
        let (frame_w, _) = self.frame_size();
        let px = x.saturating_add(frame_w + 2);
        let (label, value) = panel_styles();

        let mut row = y;
        if let Some(title) = title {
            fb.put_str(px, row, title, label);
            row += 2;
        }
        fb.put_str(px, row, "SCORE", label);
        fb.put_u32(px, row + 1, snap.score, value);
        row += 3;
        fb.put_str(px, row, "LINES", label);
        fb.put_u32(px, row + 1, snap.lines, value);
        row += 3;
        fb.put_str(px, row, "PIECES", label);
        fb.put_u32(px, row + 1, snap.pieces_locked, value);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, x: u16, y: u16, text: &str) {
        let (frame_w, frame_h) = self.frame_size();
        let text_w = text.chars().count() as u16;
        let tx = x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = Style::plain(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(tx, y.saturating_add(frame_h / 2), text, style);
    }
}

fn prepare(fb: &mut FrameBuffer, viewport: Viewport) {
    fb.resize(viewport.width, viewport.height);
    fb.clear(Style::default().glyph(' '));
}

fn panel_styles() -> (Style, Style) {
    (
        Style::plain(Rgb::new(220, 220, 220), SCREEN_BG).bold(),
        Style::plain(Rgb::new(200, 200, 200), SCREEN_BG),
    )
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Block color per kind; cells with no kind are drawn gray.
fn block_style(kind: Option<PieceKind>) -> Style {
    let fg = match kind {
        Some(PieceKind::I) => Rgb::new(80, 220, 220),
        Some(PieceKind::O) => Rgb::new(240, 220, 80),
        Some(PieceKind::T) => Rgb::new(200, 120, 220),
        Some(PieceKind::S) => Rgb::new(100, 220, 120),
        Some(PieceKind::Z) => Rgb::new(220, 80, 80),
        Some(PieceKind::J) => Rgb::new(80, 120, 220),
        Some(PieceKind::L) => Rgb::new(255, 165, 0),
        None => Rgb::new(150, 150, 150),
    };
    Style::plain(fg, WELL_BG).bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_draws_border_and_dots() {
        let view = SessionView::default();
        let fb = view.render(&SessionSnapshot::default(), Viewport::new(40, 22));
        let (x, _) = view.origin(Viewport::new(40, 22), view.block_w());
        assert_eq!(fb.get(x, 0).map(|g| g.ch), Some('┌'));
        assert_eq!(fb.get(x + 1, 1).map(|g| g.ch), Some('·'));
        assert!(fb.contains_text("SCORE"));
    }

    #[test]
    fn overlay_prefers_game_over() {
        let view = SessionView::default();
        let snap = SessionSnapshot {
            paused: true,
            game_over: true,
            ..SessionSnapshot::default()
        };
        let fb = view.render(&snap, Viewport::new(40, 22));
        assert!(fb.contains_text("GAME OVER"));
        assert!(!fb.contains_text("PAUSED"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let view = SessionView::default();
        let fb = view.render(&SessionSnapshot::default(), Viewport::new(3, 2));
        assert_eq!((fb.width(), fb.height()), (3, 2));
    }
}
