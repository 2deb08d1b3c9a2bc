//! Server configuration

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use anyhow::Context;

use tetris_duo_types::{GameConfig, PUSH_INTERVAL_MS};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often each client receives its board.
    pub push_interval_ms: u64,
    /// Rules for every session the server creates.
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            push_interval_ms: PUSH_INTERVAL_MS,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `TETRIS_DUO_HOST`, `TETRIS_DUO_PORT` and
    /// `TETRIS_DUO_PUSH_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay the environment variables onto `self`. Unset, empty or
    /// unparseable values leave the field alone.
    pub fn apply_env(&mut self) {
        use std::env;

        if let Some(host) = env::var("TETRIS_DUO_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            self.host = host;
        }
        if let Some(port) = env::var("TETRIS_DUO_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.port = port;
        }
        if let Some(ms) = env::var("TETRIS_DUO_PUSH_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.push_interval_ms = ms;
        }
    }

    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.push_interval_ms.max(1))
    }

    /// Resolve `host:port` to the first matching address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("resolving {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("no address for {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:5000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.push_interval(), Duration::from_millis(33));
    }

    #[test]
    fn zero_push_interval_is_clamped() {
        let config = ServerConfig {
            push_interval_ms: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.push_interval(), Duration::from_millis(1));
    }
}
