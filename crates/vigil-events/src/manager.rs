//! The event manager: queueing, draining and dispatch context.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tracing::{debug, trace, warn};

use vigil_core::{AnalyzerId, Args, SourceId};
use vigil_iosource::{Flare, IoSource};

use crate::event::{Event, Provenance};
use crate::forward::RemoteForwarder;
use crate::handler::EventHandlerPtr;
use crate::hook::EventHook;
use crate::queue::EventQueue;

/// Tag the manager reports to the I/O loop.
pub const EVENT_MANAGER_TAG: &str = "EventManager";

/// Provenance of the invocation currently (or most recently) running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchContext {
    /// Source of the record.
    pub source: SourceId,
    /// Analyzer that raised the record, if any.
    pub analyzer: Option<AnalyzerId>,
}

/// Marks the duration of an error-handler invocation.
#[derive(Debug)]
pub struct ErrorHandlerScope<'a> {
    depth: &'a AtomicU32,
}

impl Drop for ErrorHandlerScope<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Accepts raised events, holds them until it is safe to run them and
/// dispatches them in one globally ordered pass.
///
/// Any thread may [`enqueue`](Self::enqueue). Draining and direct dispatch
/// belong to the thread running the I/O loop. Raising an event never runs a
/// handler on the caller's stack: handlers only run from
/// [`drain`](Self::drain) or [`dispatch`](Self::dispatch), and events they
/// raise join the same drain pass.
///
/// The manager is an explicit context object. Build one at startup, share
/// it (`Arc`) with producers and the I/O loop.
pub struct EventMgr {
    queue: Mutex<EventQueue>,
    flare: Flare,
    draining: AtomicBool,
    context: Mutex<DispatchContext>,
    error_handler_depth: AtomicU32,
    forwarder: RwLock<Option<Arc<dyn RemoteForwarder>>>,
    hooks: RwLock<Vec<Arc<dyn EventHook>>>,
    flush_point: RwLock<Option<EventHandlerPtr>>,
}

impl std::fmt::Debug for EventMgr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventMgr")
            .field("size", &self.size())
            .field("draining", &self.is_draining())
            .field("armed", &self.flare.is_armed())
            .finish_non_exhaustive()
    }
}

impl Default for EventMgr {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMgr {
    /// Create an empty manager with no forwarder and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(EventQueue::new()),
            flare: Flare::new(),
            draining: AtomicBool::new(false),
            context: Mutex::new(DispatchContext::default()),
            error_handler_depth: AtomicU32::new(0),
            forwarder: RwLock::new(None),
            hooks: RwLock::new(Vec::new()),
            flush_point: RwLock::new(None),
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, EventQueue> {
        self.queue.lock().expect("event queue lock poisoned")
    }

    /// Install the transport used for auto-published handlers.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_forwarder(&self, forwarder: Arc<dyn RemoteForwarder>) {
        *self.forwarder.write().expect("forwarder lock poisoned") = Some(forwarder);
    }

    /// The installed remote transport, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn forwarder(&self) -> Option<Arc<dyn RemoteForwarder>> {
        self.forwarder.read().expect("forwarder lock poisoned").clone()
    }

    /// Add a queue/drain hook.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_hook(&self, hook: Arc<dyn EventHook>) {
        debug!(hook = %hook.name(), "event hook added");
        self.hooks.write().expect("hook lock poisoned").push(hook);
    }

    fn hooks(&self) -> Vec<Arc<dyn EventHook>> {
        self.hooks.read().expect("hook lock poisoned").clone()
    }

    /// Set the handler raised at the start of every drain pass.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_flush_point(&self, handler: Option<EventHandlerPtr>) {
        *self.flush_point.write().expect("flush point lock poisoned") = handler;
    }

    /// Raise an event.
    ///
    /// Ownership of `args` always moves into the manager. If the handler has
    /// no consumer the arguments are released right away and nothing is
    /// queued. Otherwise the record is appended to the queue and the flare
    /// is fired; no handler runs before the next drain.
    pub fn enqueue(&self, handler: &EventHandlerPtr, args: Args, provenance: Provenance) {
        if !handler.is_active() {
            trace!(event = %handler.name(), "no consumer for event, releasing arguments");
            return;
        }
        self.queue_event(Event::with_provenance(Arc::clone(handler), args, provenance));
    }

    fn queue_event(&self, event: Event) {
        let mut event = event;
        for hook in self.hooks() {
            match hook.on_queue_event(event) {
                Some(passed) => event = passed,
                None => {
                    trace!(hook = %hook.name(), "event taken over by hook");
                    return;
                },
            }
        }

        let mut queue = self.lock_queue();
        queue.push(event);
        self.flare.fire();
    }

    /// Run every queued record, including the ones raised while draining.
    ///
    /// Does nothing if a drain pass is already running. When the queue is
    /// found empty the flare is disarmed, unless another thread queued a
    /// record in the meantime.
    pub fn drain(&self) {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("drain already in progress");
            return;
        }
        let _guard = DrainGuard(&self.draining);

        let flush_point = self
            .flush_point
            .read()
            .expect("flush point lock poisoned")
            .clone();
        if let Some(flush_point) = flush_point {
            self.enqueue(&flush_point, Args::new(), Provenance::local());
        }

        for hook in self.hooks() {
            hook.on_drain_events(self);
        }

        let mut dispatched: u64 = 0;
        while let Some(event) = self.pop_event() {
            self.set_context(event.source(), event.analyzer());
            let handler = Arc::clone(event.handler());

            if let Err(e) = event.dispatch(self, false) {
                warn!(event = %handler.name(), error = %e, "event handler failed");
            }

            self.lock_queue().mark_dispatched();
            dispatched = dispatched.wrapping_add(1);
        }

        {
            let queue = self.lock_queue();
            if queue.is_empty() {
                self.flare.extinguish();
            }
        }

        debug!(dispatched, "event queue drained");
    }

    fn pop_event(&self) -> Option<Event> {
        self.lock_queue().pop()
    }

    /// Run one record right away, outside the queue.
    ///
    /// The dispatch context is set as during a drain. With `no_remote` the
    /// record is not forwarded to remote peers.
    pub fn dispatch(&self, event: Event, no_remote: bool) {
        self.set_context(event.source(), event.analyzer());
        let handler = Arc::clone(event.handler());

        if let Err(e) = event.dispatch(self, no_remote) {
            warn!(event = %handler.name(), error = %e, "event handler failed");
        }
    }

    fn set_context(&self, source: SourceId, analyzer: Option<AnalyzerId>) {
        *self.context.lock().expect("dispatch context lock poisoned") =
            DispatchContext { source, analyzer };
    }

    /// Whether a drain pass is running.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Whether records are waiting.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.lock_queue().is_empty()
    }

    /// Records queued but not yet dispatched.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.lock_queue().size()
    }

    /// Total records ever queued.
    #[must_use]
    pub fn num_queued(&self) -> u64 {
        self.lock_queue().num_queued()
    }

    /// Total records dispatched by drain passes.
    #[must_use]
    pub fn num_dispatched(&self) -> u64 {
        self.lock_queue().num_dispatched()
    }

    /// Provenance of the current or most recent invocation.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn current_context(&self) -> DispatchContext {
        *self.context.lock().expect("dispatch context lock poisoned")
    }

    /// Source of the current or most recent invocation.
    #[must_use]
    pub fn current_source(&self) -> SourceId {
        self.current_context().source
    }

    /// Analyzer of the current or most recent invocation, if any.
    #[must_use]
    pub fn current_analyzer(&self) -> Option<AnalyzerId> {
        self.current_context().analyzer
    }

    /// Whether an error handler is running.
    #[must_use]
    pub fn in_error_handler(&self) -> bool {
        self.error_handler_depth.load(Ordering::Acquire) > 0
    }

    pub(crate) fn enter_error_handler(&self) -> ErrorHandlerScope<'_> {
        self.error_handler_depth.fetch_add(1, Ordering::AcqRel);
        ErrorHandlerScope {
            depth: &self.error_handler_depth,
        }
    }

    /// The wake signal fired whenever a record is queued.
    #[must_use]
    pub fn flare(&self) -> &Flare {
        &self.flare
    }

    /// Human-readable dump of the queue and its counters.
    #[must_use]
    pub fn describe(&self) -> String {
        let queue = self.lock_queue();
        let mut out = format!(
            "{} events queued (queued={}, dispatched={}, draining={})",
            queue.len(),
            queue.num_queued(),
            queue.num_dispatched(),
            self.is_draining()
        );
        for event in queue.iter() {
            let _ = write!(out, "\n  {event}");
        }
        out
    }
}

impl IoSource for EventMgr {
    fn tag(&self) -> &str {
        EVENT_MANAGER_TAG
    }

    fn next_timeout(&self) -> Option<Duration> {
        None
    }

    fn process(&self) {
        self.drain();
    }

    fn flare(&self) -> Option<&Flare> {
        Some(&self.flare)
    }
}
