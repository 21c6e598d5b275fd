//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vigil_core::prelude::*;` to import all essential types.

// Values
pub use crate::{Args, Val, ValPtr, args};

// Provenance
pub use crate::{AnalyzerId, PeerId, SourceId};

// Cookies
pub use crate::Cookie;
