//! Vigil I/O sources - Wake signals and the scheduler loop.
//!
//! This crate provides:
//! - [`Flare`], a thread-safe "work is pending" signal that can be awaited
//! - The [`IoSource`] trait implemented by everything the loop polls
//! - [`IoManager`], which waits on flares and timeouts without busy polling
//!   and runs the `process` entry point of each ready source
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vigil_iosource::{Flare, IoManager, IoSource};
//!
//! struct Ticker(Flare);
//!
//! impl IoSource for Ticker {
//!     fn tag(&self) -> &str { "ticker" }
//!     fn next_timeout(&self) -> Option<Duration> { None }
//!     fn process(&self) { self.0.extinguish(); }
//!     fn flare(&self) -> Option<&Flare> { Some(&self.0) }
//! }
//!
//! # async fn example() {
//! let ticker = Arc::new(Ticker(Flare::new()));
//! let io = IoManager::new();
//! io.register(ticker.clone(), false);
//!
//! ticker.0.fire();
//! assert_eq!(io.run_once().await, 1);
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod flare;
mod manager;
mod source;

pub use flare::Flare;
pub use manager::IoManager;
pub use source::IoSource;
