//! Error types for event dispatch.

use thiserror::Error;

/// Failure raised by a handler body.
///
/// Handler failures are local to the event being dispatched: the engine logs
/// them and carries on with the rest of the queue.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The body reported a failure.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The body panicked; the panic was contained.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Create a failure with the given reason.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::Panicked(message)
    }
}

/// Result type of a handler body.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure while handing an event to the remote transport.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The transport is not connected.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The event could not be encoded for the wire.
    #[error("failed to encode event {name}: {source}")]
    Encode {
        /// Handler name of the event.
        name: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the event registry and manager API.
#[derive(Debug, Error)]
pub enum EventError {
    /// No handler is registered under the name.
    #[error("unknown event handler: {0}")]
    UnknownHandler(String),
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;
