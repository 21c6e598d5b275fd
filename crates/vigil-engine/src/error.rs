//! Engine error types.

use thiserror::Error;

use vigil_config::ConfigError;
use vigil_events::EventError;
use vigil_telemetry::TelemetryError;

/// Errors raised while building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be set up.
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// A handler named by the configuration could not be resolved.
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// `run` was called before `init_post_script`.
    #[error("engine is not initialized; call init_post_script first")]
    NotInitialized,

    /// `init_post_script` was called twice.
    #[error("engine is already initialized")]
    AlreadyInitialized,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
