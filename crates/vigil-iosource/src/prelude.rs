//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vigil_iosource::prelude::*;` to import all essential types.

pub use crate::{Flare, IoManager, IoSource};
