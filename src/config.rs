//! Startup configuration.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional JSON file (`--config`)
//! 3. `TETRIS_DUO_HOST` / `TETRIS_DUO_PORT` / `TETRIS_DUO_PUSH_MS`
//! 4. command-line flags, applied by the binary
//!
//! ```json
//! {
//!   "game": { "gravity_interval_ms": 400, "lock_delay_ms": 0 },
//!   "server": { "port": 6000 }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::net::ServerConfig;
use crate::types::GameConfig;

/// Server fields that may appear in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub push_interval_ms: Option<u64>,
}

/// Shape of the JSON config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub game: GameConfig,
    pub server: ServerSection,
}

impl FileConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid config JSON")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub game: GameConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Defaults, then `file`, then the environment.
    pub fn resolve(file: Option<FileConfig>) -> Self {
        let mut config = Self::default();
        if let Some(file) = file {
            config.game = file.game;
            let ServerSection {
                host,
                port,
                push_interval_ms,
            } = file.server;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(ms) = push_interval_ms {
                config.server.push_interval_ms = ms;
            }
        }
        config.server.apply_env();
        config.server.game = config.game;
        config
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = path.map(FileConfig::from_path).transpose()?;
        Ok(Self::resolve(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_overlays_defaults() {
        let file = FileConfig::from_json(r#"{"game":{"lock_delay_ms":0},"server":{"port":6001}}"#)
            .unwrap();
        assert_eq!(file.game.lock_delay_ms, 0);
        assert_eq!(file.game.gravity_interval_ms, 500);
        assert_eq!(file.server.port, Some(6001));
        assert_eq!(file.server.host, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_json(r#"{"gmae":{}}"#).is_err());
    }

    #[test]
    fn server_inherits_game_rules() {
        let file = FileConfig::from_json(r#"{"game":{"points_per_line":40}}"#).unwrap();
        let config = AppConfig::resolve(Some(file));
        assert_eq!(config.server.game.points_per_line, 40);
    }
}
