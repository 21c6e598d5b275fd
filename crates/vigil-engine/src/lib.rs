//! Vigil Engine - Startup wiring for the Vigil runtime.
//!
//! Builds the handler registry, the event manager and the I/O loop from a
//! [`Config`](vigil_config::Config), and runs the loop until shutdown.
//!
//! # Example
//!
//! ```rust
//! use vigil_config::Config;
//! use vigil_engine::Engine;
//!
//! # async fn example() -> Result<(), vigil_engine::EngineError> {
//! let engine = Engine::new(Config::default())?;
//!
//! // Bind handler bodies before the loop starts.
//! engine.registry().register("connection_established").add_body(|_, _| Ok(()));
//!
//! engine.init_post_script()?;
//! engine.run(async { /* wait for a shutdown signal */ }).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod engine;
mod error;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
