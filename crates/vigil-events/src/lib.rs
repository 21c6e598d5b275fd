//! Vigil Events - Event queue and dispatch engine.
//!
//! This crate provides:
//! - Named [`EventHandler`]s holding an ordered list of bodies
//! - The [`EventRegistry`] resolving handler names
//! - The [`EventMgr`], a FIFO queue of raised events drained in one pass
//! - Remote forwarding of auto-published handlers via [`RemoteForwarder`]
//! - Queue and drain interception via [`EventHook`]
//!
//! # Architecture
//!
//! Producers (protocol analyzers, timers, remote peers) raise events with
//! [`EventMgr::enqueue`]. Nothing runs on the producer's stack: the record
//! is appended to the queue and the manager's flare is fired. The I/O loop
//! sees the flare and calls [`EventMgr::drain`], which runs every queued
//! record in arrival order, including the ones raised by handlers during
//! the same pass.
//!
//! # Example
//!
//! ```rust
//! use vigil_core::args;
//! use vigil_events::{EventMgr, EventRegistry, Provenance};
//!
//! let registry = EventRegistry::new();
//! let mgr = EventMgr::new();
//!
//! let ping = registry.register("ping");
//! ping.add_body(|_, args| {
//!     assert_eq!(args.len(), 1);
//!     Ok(())
//! });
//!
//! mgr.enqueue(&ping, args![1_u64], Provenance::local());
//! assert_eq!(mgr.size(), 1);
//!
//! mgr.drain();
//! assert_eq!(mgr.num_dispatched(), 1);
//! assert!(!mgr.has_events());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod event;
mod forward;
mod handler;
mod hook;
mod manager;
mod queue;
mod registry;

pub use error::{EventError, EventResult, ForwardError, HandlerError, HandlerResult};
pub use event::{Event, Provenance};
pub use forward::{RemoteEvent, RemoteForwarder};
pub use handler::{EventHandler, EventHandlerPtr, HandlerBody};
pub use hook::EventHook;
pub use manager::{DispatchContext, EVENT_MANAGER_TAG, ErrorHandlerScope, EventMgr};
pub use queue::EventQueue;
pub use registry::EventRegistry;
