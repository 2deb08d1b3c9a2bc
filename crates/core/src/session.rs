//! Session module - one player's game
//!
//! A session owns a [`Grid`], the falling [`Piece`], the score and the
//! timers. It is advanced from outside in two ways:
//!
//! - [`Session::apply`] for player commands
//! - [`Session::tick`] with the time elapsed since the previous tick
//!
//! # Locking
//!
//! Gravity moves the piece one row per `gravity_interval_ms`. When a gravity
//! step finds the piece grounded the lock timer starts. It keeps running on
//! every tick while the piece stays grounded, is cancelled as soon as the
//! piece could fall again (for example after sliding off a ledge), and locks
//! the piece once it reaches `lock_delay_ms`. A lock delay of 0 locks on the
//! grounding gravity step. Hard drop always locks at once.
//!
//! # States
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Active | `Pause` | Paused |
//! | Paused | `Pause` | Active |
//! | Active | spawn collides | GameOver |
//! | GameOver | `Restart` | Active |
//!
//! Movement commands are ignored while paused; everything except `Restart`
//! is ignored after game over.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::grid::{Grid, WireGrid};
use crate::piece::Piece;
use crate::rng::PieceSource;
use crate::snapshot::{ActiveSnapshot, SessionSnapshot};
use crate::types::{Command, GameConfig, COLS, ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Paused,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    grid: Grid,
    active: Option<Piece>,
    source: PieceSource,
    score: u32,
    lines: u32,
    pieces_locked: u32,
    paused: bool,
    game_over: bool,
    /// Time accumulated toward the next gravity step.
    gravity_timer: Duration,
    /// Running while the piece is grounded and waiting to lock.
    lock_timer: Option<Duration>,
}

impl Session {
    /// Create a session and spawn its first piece.
    pub fn new(config: &GameConfig, source: PieceSource) -> Self {
        let mut session = Self {
            config: *config,
            grid: Grid::new(),
            active: None,
            source,
            score: 0,
            lines: 0,
            pieces_locked: 0,
            paused: false,
            game_over: false,
            gravity_timer: Duration::ZERO,
            lock_timer: None,
        };
        session.spawn_piece();
        session
    }

    /// Session with a uniform piece source seeded with `seed`.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::new(config, PieceSource::uniform(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for setting up positions.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn lock_timer(&self) -> Option<Duration> {
        self.lock_timer
    }

    pub fn state(&self) -> SessionState {
        if self.game_over {
            SessionState::GameOver
        } else if self.paused {
            SessionState::Paused
        } else {
            SessionState::Active
        }
    }

    /// Replace the falling piece. Refused (returns false) if it collides or
    /// the game is over.
    pub fn set_active(&mut self, piece: Piece) -> bool {
        if self.game_over || self.grid.check_collision(&piece, 0, 0) {
            return false;
        }
        self.active = Some(piece);
        self.lock_timer = None;
        true
    }

    /// Draw the next kind and place it at the spawn position.
    ///
    /// If it collides immediately the game is over. The piece is still kept
    /// as the active piece so the final frame can show it, but nothing moves
    /// it afterwards.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.source.next_kind();
        let piece = Piece::spawn(kind);
        self.gravity_timer = Duration::ZERO;
        self.lock_timer = None;
        self.active = Some(piece);

        if self.grid.check_collision(&piece, 0, 0) {
            self.game_over = true;
            info!(score = self.score, lines = self.lines, "game over");
            return false;
        }
        debug!(kind = kind.as_str(), "spawned piece");
        true
    }

    /// Add the score for `lines` cleared rows, `points_per_line` each.
    pub fn calculate_score(&mut self, lines: u32) {
        self.score = self
            .score
            .saturating_add(lines.saturating_mul(self.config.points_per_line));
    }

    /// Apply a player command. Returns true if it changed anything.
    pub fn apply(&mut self, cmd: Command) -> bool {
        if self.game_over {
            return cmd == Command::Restart && self.restart();
        }

        match cmd {
            Command::Pause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                true
            }
            Command::Restart => false,
            _ if self.paused => false,
            Command::Left => self.try_shift(-1, 0),
            Command::Right => self.try_shift(1, 0),
            Command::Down => self.try_shift(0, 1),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if self.grid.check_collision(piece, dx, dy) {
            return false;
        }
        piece.move_by(dx, dy);
        true
    }

    fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let before = *piece;
        piece.rotate();
        if self.grid.check_collision(piece, 0, 0) {
            *piece = before;
            return false;
        }
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let distance = self.grid.drop_distance(piece);
        piece.move_by(0, distance as i32);
        self.lock_active();
        true
    }

    /// Merge the active piece, clear lines, score and spawn the next piece.
    /// Returns the number of lines cleared.
    fn lock_active(&mut self) -> u32 {
        let Some(piece) = self.active else {
            return 0;
        };
        if let Err(err) = self.grid.merge(&piece) {
            // Locking only follows a collision check, so this is a logic fault.
            error!(%err, kind = piece.kind.as_str(), "merge refused");
            self.game_over = true;
            return 0;
        }

        let cleared = self.grid.clear_lines() as u32;
        self.calculate_score(cleared);
        self.lines += cleared;
        self.pieces_locked += 1;
        debug!(
            kind = piece.kind.as_str(),
            cleared,
            score = self.score,
            "piece locked"
        );

        self.spawn_piece();
        cleared
    }

    /// Advance timers by `elapsed`. Returns true if the piece moved or locked.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        if self.lock_timer.is_some() && !self.grid.check_collision(&piece, 0, 1) {
            self.lock_timer = None;
        }
        if let Some(timer) = self.lock_timer.as_mut() {
            *timer += elapsed;
            if *timer >= self.config.lock_delay() {
                self.lock_active();
                return true;
            }
        }

        self.gravity_timer += elapsed;
        if self.gravity_timer < self.config.gravity_interval() {
            return false;
        }
        self.gravity_timer = Duration::ZERO;

        if !self.grid.check_collision(&piece, 0, 1) {
            if let Some(active) = self.active.as_mut() {
                active.move_by(0, 1);
            }
            return true;
        }
        if self.lock_timer.is_none() {
            self.lock_timer = Some(Duration::ZERO);
            if self.config.lock_delay().is_zero() {
                self.lock_active();
                return true;
            }
        }
        false
    }

    /// Start over: empty grid, zero score, fresh piece.
    ///
    /// The piece source keeps its position, so a restarted game continues the
    /// same random stream instead of replaying it.
    pub fn restart(&mut self) -> bool {
        self.grid.clear();
        self.score = 0;
        self.lines = 0;
        self.pieces_locked = 0;
        self.paused = false;
        self.game_over = false;
        self.active = None;
        info!("session restarted");
        self.spawn_piece();
        true
    }

    /// Landing row of the active piece.
    pub fn ghost_y(&self) -> Option<i32> {
        let piece = self.active.as_ref()?;
        Some(piece.y + self.grid.drop_distance(piece) as i32)
    }

    /// Wire text of the settled grid. The falling piece is not included.
    pub fn serialize_board(&self) -> String {
        self.grid.serialize()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut board: WireGrid = [[0; COLS]; ROWS];
        self.grid.write_wire_grid(&mut board);
        SessionSnapshot {
            board,
            active: self.active.map(|p| ActiveSnapshot {
                kind: p.kind,
                x: p.x,
                y: p.y,
                cells: p.cells(),
            }),
            ghost_y: if self.game_over { None } else { self.ghost_y() },
            score: self.score,
            lines: self.lines,
            pieces_locked: self.pieces_locked,
            paused: self.paused,
            game_over: self.game_over,
        }
    }
}
