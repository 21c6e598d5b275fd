#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the Vigil runtime.
//!
//! This crate provides a single [`Config`] type covering event dispatch
//! settings and logging.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vigil_config::Config;
//!
//! let config = Config::load(Some(std::path::Path::new("vigil.toml"))).unwrap();
//! println!("log level: {}", config.logging.level);
//! ```
//!
//! # Precedence
//!
//! 1. **Config file** (when given)
//! 2. **Environment variables** (`VIGIL_*`), fallback only
//! 3. **Defaults**
//!
//! # Design
//!
//! This crate has **no dependencies on other internal vigil crates**. The
//! engine converts config values into runtime settings at startup.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

use std::collections::HashMap;
use std::path::Path;

impl Config {
    /// Load configuration from an optional file plus `VIGIL_*` environment
    /// fallbacks, then validate it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the resulting
    /// configuration fails validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        loader::load(path, &env::collect_env_vars())
    }

    /// Like [`Config::load`] with an explicit environment map.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_env<S: ::std::hash::BuildHasher>(
        path: Option<&Path>,
        env_vars: &HashMap<String, String, S>,
    ) -> ConfigResult<Self> {
        loader::load(path, env_vars)
    }

    /// Load a config from a specific file, without environment fallbacks.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or invalid.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content, "<string>")
    }

    /// Validate this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate(self)
    }
}
