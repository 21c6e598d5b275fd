//! Vigil Analyzers - Protocol analyzers feeding the event engine.
//!
//! This crate provides:
//! - The [`Analyzer`] trait for per-connection protocol analyzers
//! - [`Connection`], the per-connection state analyzers attach to events
//! - [`ContentLine`], a line splitter for line-oriented protocols
//! - [`FingerAnalyzer`], a reference analyzer for the Finger protocol
//!
//! Analyzers never run handlers themselves. They raise events through
//! [`Analyzer::enqueue_conn_event`], which queues the record with the
//! analyzer's id as provenance and the connection as cookie.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod analyzer;
mod connection;
mod content_line;
mod finger;

pub use analyzer::Analyzer;
pub use connection::Connection;
pub use content_line::ContentLine;
pub use finger::{FINGER_REPLY, FINGER_REQUEST, FingerAnalyzer, MAX_REQUEST_LINE};
