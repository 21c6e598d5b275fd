//! Handler slots and the handler-layer call boundary.
//!
//! An [`EventHandler`] is the named slot an event targets. It may have any
//! number of local bodies, may forward invocations to remote peers through
//! auto-publish topics, or may be completely unbound. The slot is shared
//! (`Arc`) between the registry, producers holding a handle to raise it, and
//! queued events.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{trace, warn};

use vigil_core::ValPtr;

use crate::error::{HandlerError, HandlerResult};
use crate::forward::RemoteEvent;
use crate::manager::EventMgr;

/// Shared handle to a handler slot.
pub type EventHandlerPtr = Arc<EventHandler>;

/// A local implementation of an event handler.
///
/// Bodies get the manager so they can raise follow-up events and inspect the
/// dispatch context. Any `Fn(&EventMgr, &[ValPtr]) -> HandlerResult` closure
/// is a body.
pub trait HandlerBody: Send + Sync {
    /// Run the body with the event's arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] if the body fails. The failure stays local
    /// to this invocation.
    fn call(&self, mgr: &EventMgr, args: &[ValPtr]) -> HandlerResult;
}

impl<F> HandlerBody for F
where
    F: Fn(&EventMgr, &[ValPtr]) -> HandlerResult + Send + Sync,
{
    fn call(&self, mgr: &EventMgr, args: &[ValPtr]) -> HandlerResult {
        self(mgr, args)
    }
}

#[derive(Clone)]
struct Body {
    priority: i32,
    body: Arc<dyn HandlerBody>,
}

/// A named event handler slot.
pub struct EventHandler {
    name: String,
    bodies: RwLock<Vec<Body>>,
    auto_publish: RwLock<Vec<String>>,
    enabled: AtomicBool,
    generate_always: AtomicBool,
    error_handler: AtomicBool,
    used: AtomicBool,
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("name", &self.name)
            .field("bodies", &self.body_count())
            .field("enabled", &self.is_enabled())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl EventHandler {
    /// Create an unbound, enabled handler slot.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bodies: RwLock::new(Vec::new()),
            auto_publish: RwLock::new(Vec::new()),
            enabled: AtomicBool::new(true),
            generate_always: AtomicBool::new(false),
            error_handler: AtomicBool::new(false),
            used: AtomicBool::new(false),
        }
    }

    /// The handler's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a body with default priority.
    pub fn add_body<F>(&self, body: F)
    where
        F: Fn(&EventMgr, &[ValPtr]) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_body_with_priority(0, body);
    }

    /// Add a body. Higher priorities run first; equal priorities run in
    /// insertion order.
    pub fn add_body_with_priority<F>(&self, priority: i32, body: F)
    where
        F: Fn(&EventMgr, &[ValPtr]) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_shared_body(priority, Arc::new(body));
    }

    /// Add a shared body implementation.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_shared_body(&self, priority: i32, body: Arc<dyn HandlerBody>) {
        let mut bodies = self.bodies.write().expect("handler lock poisoned");
        let at = bodies
            .iter()
            .position(|b| b.priority < priority)
            .unwrap_or(bodies.len());
        bodies.insert(at, Body { priority, body });
        trace!(handler = %self.name, priority, "handler body added");
    }

    /// Remove every local body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_bodies(&self) {
        self.bodies.write().expect("handler lock poisoned").clear();
    }

    /// Number of local bodies.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.read().expect("handler lock poisoned").len()
    }

    /// Whether at least one local body is registered.
    #[must_use]
    pub fn has_bodies(&self) -> bool {
        self.body_count() > 0
    }

    /// Enable or disable the handler. Disabled handlers never consume events.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether the handler is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Raise the event even without any consumer.
    pub fn set_generate_always(&self, always: bool) {
        self.generate_always.store(always, Ordering::Release);
    }

    /// Whether the event is raised even without any consumer.
    #[must_use]
    pub fn generate_always(&self) -> bool {
        self.generate_always.load(Ordering::Acquire)
    }

    /// Mark the handler as part of error reporting.
    pub fn set_error_handler(&self, error_handler: bool) {
        self.error_handler.store(error_handler, Ordering::Release);
    }

    /// Whether the handler is part of error reporting.
    #[must_use]
    pub fn is_error_handler(&self) -> bool {
        self.error_handler.load(Ordering::Acquire)
    }

    /// Record that some producer raises this event.
    pub fn set_used(&self) {
        self.used.store(true, Ordering::Release);
    }

    /// Whether some producer raises this event.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Acquire)
    }

    /// Forward every locally raised invocation to `topic`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn auto_publish(&self, topic: impl Into<String>) {
        let topic = topic.into();
        let mut topics = self.auto_publish.write().expect("handler lock poisoned");
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }

    /// Stop forwarding to `topic`. Returns whether the topic was present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn auto_unpublish(&self, topic: &str) -> bool {
        let mut topics = self.auto_publish.write().expect("handler lock poisoned");
        let before = topics.len();
        topics.retain(|t| t != topic);
        topics.len() != before
    }

    /// Topics invocations are forwarded to.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn auto_publish_topics(&self) -> Vec<String> {
        self.auto_publish.read().expect("handler lock poisoned").clone()
    }

    /// Whether raising this event has any effect.
    ///
    /// True when the handler is enabled and has a local body, is flagged to
    /// generate always, or forwards to at least one remote topic.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_enabled()
            && (self.has_bodies() || self.generate_always() || !self.auto_publish_topics().is_empty())
    }

    /// Invoke the handler with an event's arguments.
    ///
    /// Forwards to auto-publish topics first unless `no_remote` is set, then
    /// runs every local body. A failing or panicking body does not stop the
    /// remaining bodies; the first failure is returned.
    pub(crate) fn call(&self, mgr: &EventMgr, args: &[ValPtr], no_remote: bool) -> HandlerResult {
        if !no_remote {
            self.forward(mgr, args);
        }

        let bodies = self.bodies.read().expect("handler lock poisoned").clone();
        let mut first_error = None;

        for entry in &bodies {
            let result = catch_unwind(AssertUnwindSafe(|| entry.body.call(mgr, args)))
                .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload.as_ref())));

            if let Err(e) = result {
                warn!(handler = %self.name, priority = entry.priority, error = %e, "handler body failed");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn forward(&self, mgr: &EventMgr, args: &[ValPtr]) {
        let topics = self.auto_publish_topics();
        if topics.is_empty() {
            return;
        }
        let Some(forwarder) = mgr.forwarder() else {
            trace!(handler = %self.name, "no remote forwarder installed");
            return;
        };

        let event = RemoteEvent::new(&self.name, args);
        for topic in &topics {
            if let Err(e) = forwarder.forward(topic, &event) {
                warn!(handler = %self.name, topic = %topic, error = %e, "failed to forward event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vigil_core::args;

    #[test]
    fn test_unbound_handler_is_inactive() {
        let h = EventHandler::new("connection_established");
        assert_eq!(h.name(), "connection_established");
        assert!(!h.has_bodies());
        assert!(!h.is_active());
    }

    #[test]
    fn test_activity_rules() {
        let h = EventHandler::new("e");
        h.set_generate_always(true);
        assert!(h.is_active());
        h.set_generate_always(false);

        h.auto_publish("vigil/events");
        assert!(h.is_active());
        assert!(h.auto_unpublish("vigil/events"));
        assert!(!h.auto_unpublish("vigil/events"));
        assert!(!h.is_active());

        h.add_body(|_, _| Ok(()));
        assert!(h.is_active());

        h.set_enabled(false);
        assert!(!h.is_active());
    }

    #[test]
    fn test_auto_publish_deduplicates() {
        let h = EventHandler::new("e");
        h.auto_publish("a");
        h.auto_publish("a");
        h.auto_publish("b");
        assert_eq!(h.auto_publish_topics(), vec!["a", "b"]);
    }

    #[test]
    fn test_bodies_run_in_priority_order() {
        let mgr = EventMgr::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let h = EventHandler::new("e");

        for (priority, tag) in [(0, "default"), (10, "high"), (-5, "low"), (10, "high2")] {
            let order = Arc::clone(&order);
            h.add_body_with_priority(priority, move |_, _| {
                order.lock().unwrap().push(tag);
                Ok(())
            });
        }

        h.call(&mgr, &args![], true).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["high", "high2", "default", "low"]);
    }

    #[test]
    fn test_failing_body_does_not_stop_others() {
        let mgr = EventMgr::new();
        let ran = Arc::new(AtomicBool::new(false));
        let h = EventHandler::new("e");

        h.add_body_with_priority(5, |_, _| {
            Err(HandlerError::failed("first"))
        });
        h.add_body_with_priority(4, |_, _| -> HandlerResult {
            panic!("second")
        });
        let ran_clone = Arc::clone(&ran);
        h.add_body(move |_, _| {
            ran_clone.store(true, Ordering::SeqCst);
            Ok(())
        });

        let err = h.call(&mgr, &args![], true).unwrap_err();
        assert_eq!(err.to_string(), "handler failed: first");
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_body_sees_arguments() {
        let mgr = EventMgr::new();
        let seen = Arc::new(Mutex::new(None));
        let h = EventHandler::new("e");
        let seen_clone = Arc::clone(&seen);
        h.add_body(move |_, args: &[ValPtr]| {
            *seen_clone.lock().unwrap() = args.first().and_then(|v| v.as_count());
            Ok(())
        });

        h.call(&mgr, &args![7_u64], true).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(7));
    }
}
