//! TCP client for watching and steering a remote session.

use std::net::SocketAddr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info};

use tetris_duo_types::Command;

use crate::codec::FrameDecoder;

const FRAME_QUEUE: usize = 8;
const COMMAND_QUEUE: usize = 64;

/// Channels to a connected server. Dropping `commands` closes the write half.
pub struct RemoteClient {
    /// Complete frame texts, oldest first.
    pub frames: mpsc::Receiver<String>,
    pub commands: mpsc::Sender<Command>,
}

/// Connect and spawn the reader and writer tasks on the current runtime.
pub async fn connect(addr: SocketAddr) -> anyhow::Result<RemoteClient> {
    let socket = TcpStream::connect(addr).await?;
    socket.set_nodelay(true)?;
    info!(%addr, "connected");
    let (reader, mut writer) = socket.into_split();

    let (frame_tx, frames) = mpsc::channel(FRAME_QUEUE);
    tokio::spawn(async move {
        if let Err(err) = read_frames(BufReader::new(reader), frame_tx).await {
            debug!(%err, "frame reader stopped");
        }
        info!("server closed the connection");
    });

    let (commands, mut cmd_rx) = mpsc::channel::<Command>(COMMAND_QUEUE);
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let mut line = String::with_capacity(12);
            line.push_str(cmd.as_token());
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
        let _ = writer.shutdown().await;
    });

    Ok(RemoteClient { frames, commands })
}

/// Split the stream into frames and forward them until EOF.
pub async fn read_frames<R>(mut reader: R, tx: mpsc::Sender<String>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut decoder = FrameDecoder::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        if let Some(frame) = decoder.push_line(&line) {
            if tx.send(frame).await.is_err() {
                return Ok(());
            }
        }
    }
}
