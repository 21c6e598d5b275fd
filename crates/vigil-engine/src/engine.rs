//! The engine: one registry, one event manager, one I/O loop.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use vigil_analyzers::{Connection, FingerAnalyzer};
use vigil_config::Config;
use vigil_events::{EventMgr, EventRegistry};
use vigil_iosource::{IoManager, IoSource};
use vigil_telemetry::{LogConfig, setup_logging};

use crate::error::{EngineError, EngineResult};

/// Owns the process-wide dispatch state.
///
/// Handler bodies are bound through [`registry`](Self::registry) between
/// [`new`](Self::new) and [`init_post_script`](Self::init_post_script).
#[derive(Debug)]
pub struct Engine {
    config: Config,
    registry: Arc<EventRegistry>,
    events: Arc<EventMgr>,
    io: Arc<IoManager>,
    initialized: AtomicBool,
}

impl Engine {
    /// Build an engine from a validated configuration.
    ///
    /// Marks the configured error handlers and installs the flush point.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> EngineResult<Self> {
        config.validate()?;

        let registry = Arc::new(EventRegistry::new());
        let events = Arc::new(EventMgr::new());

        for name in &config.events.error_handlers {
            registry.register(name);
            registry.set_error_handler(name)?;
        }

        if let Some(name) = &config.events.flush_point {
            let flush_point = registry.register(name);
            flush_point.set_used();
            events.set_flush_point(Some(flush_point));
        }

        debug!(
            error_handlers = config.events.error_handlers.len(),
            flush_point = ?config.events.flush_point,
            "engine created"
        );

        Ok(Self {
            config,
            registry,
            events,
            io: Arc::new(IoManager::new()),
            initialized: AtomicBool::new(false),
        })
    }

    /// Load configuration from `path` (plus env fallbacks) and build an
    /// engine from it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the file is unreadable or invalid.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        Self::new(Config::load(Some(path))?)
    }

    /// Install the global `tracing` subscriber described by the config.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Telemetry`] if a subscriber is already set or
    /// the filter is invalid.
    pub fn init_logging(&self) -> EngineResult<()> {
        setup_logging(&LogConfig::try_from(&self.config.logging)?)?;
        Ok(())
    }

    /// The configuration the engine was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The handler registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// The event manager.
    #[must_use]
    pub fn events(&self) -> &Arc<EventMgr> {
        &self.events
    }

    /// The I/O loop.
    #[must_use]
    pub fn io(&self) -> &Arc<IoManager> {
        &self.io
    }

    /// Finish startup once handler bodies are bound.
    ///
    /// Registers the event manager with the I/O loop as a source that does
    /// not keep the loop alive by itself, and reports handlers that have
    /// bodies but that nothing raises.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyInitialized`] on a second call.
    pub fn init_post_script(&self) -> EngineResult<()> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Err(EngineError::AlreadyInitialized);
        }

        let source = Arc::clone(&self.events) as Arc<dyn IoSource>;
        self.io.register(source, true);

        if self.config.events.warn_unused_handlers {
            for name in self.unused_handlers() {
                warn!(handler = %name, "event handler is defined but never raised");
            }
        }

        info!(handlers = self.registry.len(), "event engine initialized");
        Ok(())
    }

    /// Whether [`init_post_script`](Self::init_post_script) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Handlers with bodies that no producer has claimed.
    #[must_use]
    pub fn unused_handlers(&self) -> Vec<String> {
        self.registry.unused_handlers()
    }

    /// Attach a Finger analyzer to a connection.
    #[must_use]
    pub fn attach_finger(&self, conn: Arc<Connection>) -> FingerAnalyzer {
        FingerAnalyzer::new(conn, &self.registry, Arc::clone(&self.events))
    }

    /// Run the I/O loop until `shutdown` resolves or no counted source is
    /// left, then drain whatever is still queued.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] if
    /// [`init_post_script`](Self::init_post_script) was not called.
    pub async fn run<F>(&self, shutdown: F) -> EngineResult<()>
    where
        F: Future<Output = ()>,
    {
        if !self.is_initialized() {
            return Err(EngineError::NotInitialized);
        }

        self.io.run(shutdown).await;
        self.events.drain();

        info!(
            queued = self.events.num_queued(),
            dispatched = self.events.num_dispatched(),
            "event engine stopped"
        );
        Ok(())
    }

    /// Drain the event queue without the I/O loop.
    ///
    /// Returns the number of records dispatched.
    pub fn run_until_idle(&self) -> u64 {
        let before = self.events.num_dispatched();
        self.events.drain();
        self.events.num_dispatched().wrapping_sub(before)
    }
}
