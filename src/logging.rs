//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    /// Full-screen modes without a log file: stderr would tear the screen.
    Off,
}

/// Level from `TETRIS_DUO_LOG`, if set and valid.
pub fn level_from_env() -> Option<Level> {
    std::env::var("TETRIS_DUO_LOG")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

pub fn init(level: Level, target: LogTarget<'_>) -> anyhow::Result<()> {
    let filter = LevelFilter::from_level(level);
    match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?,
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .try_init()?
        }
        LogTarget::Off => {}
    }
    Ok(())
}
