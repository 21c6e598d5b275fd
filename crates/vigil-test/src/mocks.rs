//! Mock implementations for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vigil_core::{AnalyzerId, SourceId, Val, ValPtr};
use vigil_events::{
    Event, EventHandler, EventHook, EventMgr, ForwardError, HandlerBody, HandlerError,
    HandlerResult, RemoteEvent, RemoteForwarder,
};

/// Shared, ordered log of handler invocations.
///
/// Several [`RecordingHandler`]s can write to one log to check the global
/// order in which a drain ran them.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        if let Ok(mut guard) = self.0.lock() {
            guard.push(entry.into());
        }
    }

    /// Snapshot of every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One captured handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Argument values, copied out of the shared pointers.
    pub args: Vec<Val>,
    /// Source reported by the manager while the body ran.
    pub source: SourceId,
    /// Analyzer reported by the manager while the body ran.
    pub analyzer: Option<AnalyzerId>,
    /// Whether the body ran inside an error-handler scope.
    pub in_error_handler: bool,
}

/// Handler body that records every call it receives.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    label: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    log: Option<CallLog>,
}

impl RecordingHandler {
    /// Create a recorder; `label` is what it writes to a shared log.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            log: None,
        }
    }

    /// Also write the label to `log` on each call.
    #[must_use]
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Attach this recorder as a body of `handler`.
    pub fn bind(&self, handler: &EventHandler) {
        handler.add_shared_body(0, Arc::new(self.clone()));
    }

    /// Every captured call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of captured calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|g| g.len()).unwrap_or_default()
    }
}

impl HandlerBody for RecordingHandler {
    fn call(&self, mgr: &EventMgr, args: &[ValPtr]) -> HandlerResult {
        let context = mgr.current_context();
        let call = RecordedCall {
            args: args.iter().map(|v| (**v).clone()).collect(),
            source: context.source,
            analyzer: context.analyzer,
            in_error_handler: mgr.in_error_handler(),
        };
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(call);
        }
        if let Some(log) = &self.log {
            log.push(self.label.clone());
        }
        Ok(())
    }
}

/// Handler body that always fails, by error or by panic.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
    panic: bool,
    calls: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// A body returning [`HandlerError::Failed`] with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            panic: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A body that panics with `message`.
    #[must_use]
    pub fn panicking(message: impl Into<String>) -> Self {
        Self {
            panic: true,
            ..Self::new(message)
        }
    }

    /// Attach this body to `handler`.
    pub fn bind(&self, handler: &EventHandler) {
        handler.add_shared_body(0, Arc::new(self.clone()));
    }

    /// How many times the body ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HandlerBody for FailingHandler {
    fn call(&self, _mgr: &EventMgr, _args: &[ValPtr]) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("{}", self.message);
        }
        Err(HandlerError::failed(self.message.clone()))
    }
}

/// Remote transport that captures forwarded events.
#[derive(Debug, Clone, Default)]
pub struct MockForwarder {
    forwarded: Arc<Mutex<Vec<(String, RemoteEvent)>>>,
    fail: bool,
}

impl MockForwarder {
    /// Create a transport that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that rejects every event (still recording it).
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every `(topic, event)` pair seen, oldest first.
    #[must_use]
    pub fn forwarded(&self) -> Vec<(String, RemoteEvent)> {
        self.forwarded.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of forward calls.
    #[must_use]
    pub fn forward_count(&self) -> usize {
        self.forwarded.lock().map(|g| g.len()).unwrap_or_default()
    }
}

impl RemoteForwarder for MockForwarder {
    fn forward(&self, topic: &str, event: &RemoteEvent) -> Result<(), ForwardError> {
        if let Ok(mut guard) = self.forwarded.lock() {
            guard.push((topic.to_string(), event.clone()));
        }
        if self.fail {
            return Err(ForwardError::Unavailable(format!("mock peer for {topic} is down")));
        }
        Ok(())
    }
}

/// Hook counting queue and drain notifications.
///
/// Optionally takes over every event raised on one handler name.
#[derive(Debug, Default)]
pub struct CountingHook {
    queued: AtomicUsize,
    drains: AtomicUsize,
    swallow: Option<String>,
}

impl CountingHook {
    /// A hook that lets everything through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook that consumes events raised on `handler`.
    #[must_use]
    pub fn swallowing(handler: impl Into<String>) -> Self {
        Self {
            swallow: Some(handler.into()),
            ..Self::default()
        }
    }

    /// Events seen before queueing.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Drain passes seen.
    #[must_use]
    pub fn drains(&self) -> usize {
        self.drains.load(Ordering::SeqCst)
    }
}

impl EventHook for CountingHook {
    fn on_queue_event(&self, event: Event) -> Option<Event> {
        self.queued.fetch_add(1, Ordering::SeqCst);
        match &self.swallow {
            Some(name) if event.handler().name() == name => None,
            _ => Some(event),
        }
    }

    fn on_drain_events(&self, _mgr: &EventMgr) {
        self.drains.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "counting"
    }
}
