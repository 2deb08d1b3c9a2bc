//! Session runner - a worker thread that drives one session
//!
//! The worker waits on its command queue until the next frame is due,
//! applying commands as they arrive, then ticks the session with the real
//! time elapsed since the previous tick. Commands and ticks never interleave
//! inside a single session operation because both go through
//! [`SessionHandle`].

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use tetris_duo_types::{Command, GameConfig};

use crate::handle::SessionHandle;

enum Message {
    Command(Command),
    Stop,
}

/// Starts worker threads for sessions.
pub struct SessionRunner;

impl SessionRunner {
    /// Spawn a worker ticking `session` every `config.frame_ms`.
    pub fn spawn(session: SessionHandle, config: &GameConfig) -> io::Result<RunnerHandle> {
        Self::spawn_named(session, config, "session-runner")
    }

    pub fn spawn_named(
        session: SessionHandle,
        config: &GameConfig,
        name: &str,
    ) -> io::Result<RunnerHandle> {
        let (tx, rx) = mpsc::channel();
        let frame = config.frame();
        let worker_session = session.clone();
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_loop(&worker_session, &rx, frame))?;
        debug!(thread = name, frame_ms = frame.as_millis() as u64, "runner started");

        Ok(RunnerHandle {
            session,
            commands: tx,
            thread: Some(thread),
        })
    }
}

fn run_loop(session: &SessionHandle, rx: &mpsc::Receiver<Message>, frame: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = frame
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        match rx.recv_timeout(timeout) {
            Ok(Message::Command(cmd)) => {
                session.apply(cmd);
                continue;
            }
            Ok(Message::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        session.tick(now - last_tick);
        last_tick = now;
    }
}

/// Owner of a running worker. Dropping it stops and joins the thread.
pub struct RunnerHandle {
    session: SessionHandle,
    commands: Sender<Message>,
    thread: Option<JoinHandle<()>>,
}

impl RunnerHandle {
    /// Queue a command. Returns false once the worker has exited.
    pub fn send(&self, cmd: Command) -> bool {
        self.commands.send(Message::Command(cmd)).is_ok()
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the worker and wait for it. Safe to call more than once.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.commands.send(Message::Stop);
        if thread.join().is_err() {
            warn!("runner thread panicked");
        }
    }
}

impl Drop for RunnerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
