//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vigil_events::prelude::*;` to import all essential types.

// Manager
pub use crate::{DispatchContext, EventMgr, EventQueue};

// Events and handlers
pub use crate::{Event, EventHandler, EventHandlerPtr, EventRegistry, HandlerBody, Provenance};

// Extension points
pub use crate::{EventHook, RemoteEvent, RemoteForwarder};

// Errors
pub use crate::{EventError, EventResult, ForwardError, HandlerError, HandlerResult};
