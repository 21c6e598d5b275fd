//! Name-to-handler registry.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{EventError, EventResult};
use crate::handler::{EventHandler, EventHandlerPtr};

/// Registry of every handler slot known to the process.
///
/// Producers and handler bindings resolve names here once and keep the
/// returned [`EventHandlerPtr`]; registering the same name twice yields the
/// same slot.
#[derive(Debug, Default)]
pub struct EventRegistry {
    handlers: DashMap<String, EventHandlerPtr>,
}

impl EventRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a handler, creating an unbound slot if none exists.
    pub fn register(&self, name: &str) -> EventHandlerPtr {
        if let Some(existing) = self.handlers.get(name) {
            return Arc::clone(existing.value());
        }
        let entry = self.handlers.entry(name.to_string()).or_insert_with(|| {
            debug!(handler = %name, "event handler registered");
            Arc::new(EventHandler::new(name))
        });
        Arc::clone(entry.value())
    }

    /// Look up a handler by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<EventHandlerPtr> {
        self.handlers.get(name).map(|h| Arc::clone(h.value()))
    }

    /// Look up a handler that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownHandler`] if no handler has that name.
    pub fn require(&self, name: &str) -> EventResult<EventHandlerPtr> {
        self.lookup(name)
            .ok_or_else(|| EventError::UnknownHandler(name.to_string()))
    }

    /// Flag a registered handler as an error handler.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownHandler`] if no handler has that name.
    pub fn set_error_handler(&self, name: &str) -> EventResult<()> {
        self.require(name)?.set_error_handler(true);
        Ok(())
    }

    /// All handler names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|h| h.key().clone()).collect();
        names.sort();
        names
    }

    /// Handlers some producer raises, sorted.
    #[must_use]
    pub fn used_handlers(&self) -> Vec<String> {
        self.filtered_names(|h| h.is_used())
    }

    /// Handlers with local bodies that no producer raises, sorted.
    #[must_use]
    pub fn unused_handlers(&self) -> Vec<String> {
        self.filtered_names(|h| h.has_bodies() && !h.is_used())
    }

    fn filtered_names(&self, pred: impl Fn(&EventHandler) -> bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .iter()
            .filter(|h| pred(h.value()))
            .map(|h| h.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_lookup_or_create() {
        let registry = EventRegistry::new();
        assert!(registry.is_empty());

        let a = registry.register("connection_established");
        let b = registry.register("connection_established");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("connection_established").is_some());
        assert!(registry.lookup("other").is_none());
    }

    #[test]
    fn test_require_unknown() {
        let registry = EventRegistry::new();
        let err = registry.require("nope").unwrap_err();
        assert!(matches!(err, EventError::UnknownHandler(ref n) if n == "nope"));
        assert!(registry.set_error_handler("nope").is_err());
    }

    #[test]
    fn test_error_handler_flag() {
        let registry = EventRegistry::new();
        let h = registry.register("reporter_error");
        registry.set_error_handler("reporter_error").unwrap();
        assert!(h.is_error_handler());
    }

    #[test]
    fn test_used_and_unused() {
        let registry = EventRegistry::new();
        let raised = registry.register("finger_request");
        let handled = registry.register("finger_reply");
        let _idle = registry.register("idle");

        raised.set_used();
        handled.add_body(|_, _| Ok(()));

        assert_eq!(registry.names(), vec!["finger_reply", "finger_request", "idle"]);
        assert_eq!(registry.used_handlers(), vec!["finger_request"]);
        assert_eq!(registry.unused_handlers(), vec!["finger_reply"]);
    }
}
