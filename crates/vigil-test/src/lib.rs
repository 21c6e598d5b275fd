//! Vigil Test - Shared test utilities for the Vigil runtime.
//!
//! This crate provides mock handler bodies, a mock remote transport and
//! fixtures that can be used across multiple Vigil crates as a
//! dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! vigil-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use vigil_events::Provenance;
//!     use vigil_test::{RecordingHandler, five, test_manager, test_registry};
//!
//!     #[test]
//!     fn test_drain() {
//!         let registry = test_registry();
//!         let mgr = test_manager();
//!         let ping = registry.register("ping");
//!         let recorder = RecordingHandler::new("ping");
//!         recorder.bind(&ping);
//!
//!         mgr.enqueue(&ping, vec![five()], Provenance::local());
//!         mgr.drain();
//!
//!         assert_eq!(recorder.call_count(), 1);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
