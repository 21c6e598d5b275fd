//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vigil_analyzers::prelude::*;` to import all essential types.

pub use crate::{Analyzer, Connection, ContentLine, FingerAnalyzer};
