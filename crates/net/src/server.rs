//! TCP game server
//!
//! Every connection gets its own [`Session`]. The connection task ticks that
//! session every frame, writes its serialized board every push interval and
//! applies command tokens read from the socket. A client that disconnects
//! only ends its own session.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use tetris_duo_core::{PieceSource, Session};
use tetris_duo_types::Command;

use crate::config::ServerConfig;

/// Commands buffered per client before the reader waits.
const COMMAND_QUEUE: usize = 64;

/// Accept clients forever.
///
/// The bound address is sent on `ready_tx` once listening, which lets callers
/// bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let config = Arc::new(config);
    let mut client_id_counter = 0usize;

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(err) = handle_client(socket, client_id, &config).await {
                warn!(client_id, %err, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    socket.set_nodelay(true)?;
    let (reader, mut writer) = socket.into_split();

    let (cmd_tx, mut cmd_rx) = mpsc::channel(COMMAND_QUEUE);
    let read_task = tokio::spawn(read_commands(BufReader::new(reader), cmd_tx));

    let mut session = Session::new(&config.game, PieceSource::from_entropy());
    let mut frame = tokio::time::interval(config.game.frame());
    frame.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut push = tokio::time::interval(config.push_interval());
    push.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();
    let mut was_over = false;

    let result = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break Ok(()) };
                session.apply(cmd);
            }
            _ = frame.tick() => {
                let now = Instant::now();
                session.tick(now - last_tick);
                last_tick = now;
            }
            _ = push.tick() => {
                if let Err(err) = writer.write_all(session.serialize_board().as_bytes()).await {
                    break Err(err.into());
                }
            }
        }

        if session.is_game_over() != was_over {
            was_over = session.is_game_over();
            if was_over {
                info!(client_id, score = session.score(), lines = session.lines(), "client game over");
            }
        }
    };

    read_task.abort();
    result
}

/// Forward parsed command tokens until EOF. Unknown tokens are dropped.
pub async fn read_commands<R>(mut reader: R, tx: mpsc::Sender<Command>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        match Command::parse(token) {
            Some(cmd) => {
                if tx.send(cmd).await.is_err() {
                    return Ok(());
                }
            }
            None => debug!(token, "ignoring unknown command"),
        }
    }
}
