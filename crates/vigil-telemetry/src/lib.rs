//! Vigil Telemetry - Logging for the Vigil runtime.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - Stdout, stderr and rotating file targets
//! - Integration with the tracing ecosystem
//!
//! # Example
//!
//! ```rust,no_run
//! use vigil_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), vigil_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("vigil_events=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileSink, LogConfig, LogFormat, LogSink, RotationPeriod, setup_default_logging, setup_logging,
};
