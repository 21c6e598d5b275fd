//! Queue and drain hooks.

use crate::event::Event;
use crate::manager::EventMgr;

/// Observer plugged into the event manager.
///
/// Hooks run on the thread that queues or drains; they must return quickly.
pub trait EventHook: Send + Sync {
    /// Called before a record is queued.
    ///
    /// Return the record to let it be queued, or `None` to take it over.
    /// Records taken over are not counted as queued.
    fn on_queue_event(&self, event: Event) -> Option<Event> {
        Some(event)
    }

    /// Called at the start of every drain pass.
    fn on_drain_events(&self, mgr: &EventMgr) {
        let _ = mgr;
    }

    /// Optional name for debugging.
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "anonymous"
    }
}
