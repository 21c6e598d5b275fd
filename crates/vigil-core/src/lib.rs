//! Vigil Core - Foundation types for the Vigil event dispatch engine.
//!
//! This crate provides:
//! - Argument values ([`Val`], [`ValPtr`], [`Args`]) carried by events
//! - Provenance identifiers ([`SourceId`], [`PeerId`], [`AnalyzerId`])
//! - The non-owning [`Cookie`] handle attached to queued events

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod cookie;
pub mod ids;
pub mod val;

pub use cookie::Cookie;
pub use ids::{AnalyzerId, PeerId, SourceId};
pub use val::{Args, Val, ValPtr, describe_args};
