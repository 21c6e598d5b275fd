use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default name of the handler raised at the start of each drain.
pub const DEFAULT_FLUSH_POINT: &str = "event_queue_flush_point";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Event dispatch settings.
    pub events: EventsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Event dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Handler raised at the start of every drain pass, if any.
    pub flush_point: Option<String>,
    /// Handlers that run inside the error-handler scope.
    pub error_handlers: Vec<String>,
    /// Log handlers that have bodies but that nothing raises.
    pub warn_unused_handlers: bool,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            flush_point: Some(DEFAULT_FLUSH_POINT.to_owned()),
            error_handlers: Vec::new(),
            warn_unused_handlers: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Output format: `pretty`, `compact`, `json` or `full`.
    pub format: String,
    /// Extra filter directives, e.g. `vigil_events=trace`.
    pub directives: Vec<String>,
    /// Where records go: `stderr`, `stdout` or `file`.
    pub target: String,
    /// Log directory. Required when `target = "file"`.
    pub directory: Option<PathBuf>,
    /// File name prefix for rotated log files.
    pub file_prefix: String,
    /// Rotation period for log files: `daily`, `hourly`, `minutely` or `never`.
    pub rotation: String,
    /// Rotated files to keep. 0 keeps all of them.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            target: "stderr".to_owned(),
            directory: None,
            file_prefix: "vigil".to_owned(),
            rotation: "daily".to_owned(),
            max_files: 0,
        }
    }
}
