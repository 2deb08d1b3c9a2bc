//! Terminal front-end (default binary).
//!
//! - `play`: one local game
//! - `duel`: two local games on one keyboard
//! - `serve`: TCP server, one game per connection
//! - `watch`: connect to a server, show its board and send keys to it

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{info, Level};

use tetris_duo::config::AppConfig;
use tetris_duo::core::{PieceSource, Session};
use tetris_duo::input::{handle_duel_key_event, handle_key_event, should_quit};
use tetris_duo::logging::{self, LogTarget};
use tetris_duo::net::{connect, run_server, RemoteBoard};
use tetris_duo::runner::{Duel, SessionHandle, SessionRunner};
use tetris_duo::term::{BoardStatus, FrameBuffer, SessionView, TerminalRenderer, Viewport};
use tetris_duo::types::GameConfig;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// error, warn, info, debug or trace (default: $TETRIS_DUO_LOG, then info)
    #[arg(long, global = true)]
    log_level: Option<Level>,

    /// Write logs here; required to see logs in full-screen modes
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    rules: RuleArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct RuleArgs {
    #[arg(long, global = true)]
    gravity_ms: Option<u64>,

    /// 0 locks a grounded piece immediately
    #[arg(long, global = true)]
    lock_delay_ms: Option<u64>,

    #[arg(long, global = true)]
    points_per_line: Option<u32>,
}

impl RuleArgs {
    fn apply(&self, game: &mut GameConfig) {
        if let Some(ms) = self.gravity_ms {
            game.gravity_interval_ms = ms;
        }
        if let Some(ms) = self.lock_delay_ms {
            game.lock_delay_ms = ms;
        }
        if let Some(points) = self.points_per_line {
            game.points_per_line = points;
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Single-player game
    Play {
        /// Seed for the piece sequence
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Two players, one keyboard: WASD + Space against arrows + Enter
    Duel {
        /// Seed for player one; player two uses seed + 1
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a game server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Board push interval in milliseconds
        #[arg(long)]
        push_ms: Option<u64>,
    },
    /// Play on a server
    Watch {
        /// Server address, e.g. 127.0.0.1:5000 (default: configured host and port)
        addr: Option<SocketAddr>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.rules.apply(&mut config.game);
    config.server.game = config.game;

    let level = cli
        .log_level
        .or_else(logging::level_from_env)
        .unwrap_or(Level::INFO);
    let target = match (&cli.command, cli.log_file.as_deref()) {
        (_, Some(path)) => LogTarget::File(path),
        (Commands::Serve { .. }, None) => LogTarget::Stderr,
        (_, None) => LogTarget::Off,
    };
    logging::init(level, target)?;

    match cli.command {
        Commands::Play { seed } => play(&config.game, seed),
        Commands::Duel { seed } => duel(&config.game, seed),
        Commands::Serve {
            host,
            port,
            push_ms,
        } => {
            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(ms) = push_ms {
                server.push_interval_ms = ms;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_server(server, None))
        }
        Commands::Watch { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => config.server.socket_addr()?,
            };
            watch(&config.game, addr)
        }
    }
}

fn source(seed: Option<u64>) -> PieceSource {
    seed.map(PieceSource::uniform)
        .unwrap_or_else(PieceSource::from_entropy)
}

fn play(game: &GameConfig, seed: Option<u64>) -> Result<()> {
    let session = SessionHandle::new(Session::new(game, source(seed)));
    let runner = SessionRunner::spawn(session, game)?;
    let view = SessionView::default();
    info!(?seed, "solo game started");

    with_terminal(|term| {
        event_loop(
            term,
            game.frame(),
            |viewport, fb| view.render_into(&runner.handle().snapshot(), viewport, fb),
            |key| {
                if let Some(cmd) = handle_key_event(key) {
                    runner.send(cmd);
                }
            },
        )
    })
}

fn duel(game: &GameConfig, seed: Option<u64>) -> Result<()> {
    let (one, two) = match seed {
        Some(seed) => (
            PieceSource::uniform(seed),
            PieceSource::uniform(seed.wrapping_add(1)),
        ),
        None => (PieceSource::from_entropy(), PieceSource::from_entropy()),
    };
    let duel = Duel::spawn(game, one, two)?;
    let view = SessionView::default();
    info!(?seed, "duel started");

    with_terminal(|term| {
        event_loop(
            term,
            game.frame(),
            |viewport, fb| view.render_duel_into(&duel.snapshots(), viewport, fb),
            |key| {
                for (player, cmd) in handle_duel_key_event(key) {
                    duel.send(player, cmd);
                }
            },
        )
    })
}

fn watch(game: &GameConfig, addr: SocketAddr) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let mut client = runtime
        .block_on(connect(addr))
        .with_context(|| format!("connecting to {addr}"))?;
    let commands = client.commands.clone();
    let view = SessionView::default();
    let mut board = RemoteBoard::new();
    let mut connected = true;

    with_terminal(|term| {
        event_loop(
            term,
            game.frame(),
            |viewport, fb| {
                loop {
                    match client.frames.try_recv() {
                        Ok(frame) => {
                            let _ = board.apply(&frame);
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            connected = false;
                            break;
                        }
                    }
                }
                let status = BoardStatus {
                    connected,
                    frames: board.frames_applied(),
                    rejected: board.rejected_frames(),
                };
                view.render_board_into(&board.wire_grid(), status, viewport, fb);
            },
            |key| {
                if let Some(cmd) = handle_key_event(key) {
                    let _ = commands.try_send(cmd);
                }
            },
        )
    })
}

fn with_terminal(f: impl FnOnce(&mut TerminalRenderer) -> Result<()>) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = f(&mut term);
    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Draw, then wait up to one frame for a key. Returns on the quit key.
fn event_loop(
    term: &mut TerminalRenderer,
    frame: Duration,
    mut draw: impl FnMut(Viewport, &mut FrameBuffer),
    mut on_key: impl FnMut(KeyEvent),
) -> Result<()> {
    let mut fb = FrameBuffer::new(0, 0);
    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        draw(Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if should_quit(key) {
                    return Ok(());
                }
                on_key(key);
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
