//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vigil_telemetry::prelude::*;` to import all essential types.

pub use crate::{LogConfig, LogFormat, LogSink, setup_default_logging, setup_logging};

pub use crate::{TelemetryError, TelemetryResult};
