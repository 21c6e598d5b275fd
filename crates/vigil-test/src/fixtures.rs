//! Test fixtures for common types.

use std::sync::{Arc, Once};

use vigil_core::{Val, ValPtr};
use vigil_events::{EventMgr, EventRegistry};

static TRACING: Once = Once::new();

/// Create an empty shared handler registry.
#[must_use]
pub fn test_registry() -> Arc<EventRegistry> {
    Arc::new(EventRegistry::new())
}

/// Create an empty shared event manager.
#[must_use]
pub fn test_manager() -> Arc<EventMgr> {
    Arc::new(EventMgr::new())
}

/// The argument `5` as a shared value.
#[must_use]
pub fn five() -> ValPtr {
    Arc::new(Val::Count(5))
}

/// Route `tracing` output through the test harness writer.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
