//! Server start options and log level.

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Verbosity of the server's log output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
}

impl LogLevel {
    /// Whether a server at this level emits events at `level`.
    pub fn allows(self, level: Level) -> bool {
        level <= Level::from(self)
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
        }
    }
}

/// Options for [`MockServer::start`](crate::server::MockServer::start)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOptions {
    pub port: u16,
    /// Level of the server's own request logs. The process-wide fmt
    /// subscriber is installed once, at the level of the first start.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl StartOptions {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            log_level: LogLevel::default(),
        }
    }

    pub fn log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}
