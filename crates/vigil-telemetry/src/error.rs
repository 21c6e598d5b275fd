//! Telemetry error types.

use thiserror::Error;

/// Reasons logging could not be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A level, directive, format or rotation name did not parse.
    #[error("invalid log setting: {0}")]
    InvalidSetting(String),

    /// The rotating file writer could not be created.
    #[error("cannot open log files: {0}")]
    Sink(String),

    /// Another global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInstalled(String),

    /// Creating the log directory failed.
    #[error("log directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
