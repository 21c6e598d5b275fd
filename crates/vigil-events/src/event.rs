//! Event records.

use std::fmt;

use vigil_core::{AnalyzerId, Args, Cookie, PeerId, SourceId, ValPtr, describe_args};

use crate::error::HandlerResult;
use crate::handler::EventHandlerPtr;
use crate::manager::EventMgr;

/// Where an event came from.
///
/// The default is a local event not raised by any analyzer.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    source: SourceId,
    analyzer: Option<AnalyzerId>,
    cookie: Option<Cookie>,
}

impl Provenance {
    /// A local event.
    #[must_use]
    pub fn local() -> Self {
        Self::default()
    }

    /// An event received from `peer`.
    #[must_use]
    pub fn remote(peer: PeerId) -> Self {
        Self {
            source: SourceId::Remote(peer),
            ..Self::default()
        }
    }

    /// Attribute the event to an analyzer instance.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: AnalyzerId) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Attach a borrowed cookie.
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookie = Some(cookie);
        self
    }

    /// Source of the event.
    #[must_use]
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Originating analyzer, if any.
    #[must_use]
    pub fn analyzer(&self) -> Option<AnalyzerId> {
        self.analyzer
    }

    /// Attached cookie, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&Cookie> {
        self.cookie.as_ref()
    }
}

/// One pending handler invocation.
///
/// A record is immutable once built. Dispatching consumes it, so its
/// arguments are released exactly once whatever the handler does.
pub struct Event {
    handler: EventHandlerPtr,
    args: Args,
    provenance: Provenance,
}

impl Event {
    /// Build a local record with no analyzer.
    #[must_use]
    pub fn new(handler: EventHandlerPtr, args: Args) -> Self {
        Self::with_provenance(handler, args, Provenance::default())
    }

    /// Build a record with explicit provenance.
    #[must_use]
    pub fn with_provenance(handler: EventHandlerPtr, args: Args, provenance: Provenance) -> Self {
        Self {
            handler,
            args,
            provenance,
        }
    }

    /// Target handler.
    #[must_use]
    pub fn handler(&self) -> &EventHandlerPtr {
        &self.handler
    }

    /// Argument values.
    #[must_use]
    pub fn args(&self) -> &[ValPtr] {
        &self.args
    }

    /// Provenance of the record.
    #[must_use]
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Source of the record.
    #[must_use]
    pub fn source(&self) -> SourceId {
        self.provenance.source
    }

    /// Originating analyzer, if any.
    #[must_use]
    pub fn analyzer(&self) -> Option<AnalyzerId> {
        self.provenance.analyzer
    }

    /// Attached cookie, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&Cookie> {
        self.provenance.cookie.as_ref()
    }

    /// Invoke the handler and release the record.
    ///
    /// Records received from a remote peer are never forwarded again.
    pub(crate) fn dispatch(self, mgr: &EventMgr, no_remote: bool) -> HandlerResult {
        let no_remote = no_remote || self.source().is_remote();

        if let Some(cookie) = self.cookie() {
            debug_assert!(
                cookie.is_alive(),
                "cookie of event {} released before dispatch",
                self.handler.name()
            );
        }

        let _scope = self
            .handler
            .is_error_handler()
            .then(|| mgr.enter_error_handler());

        self.handler.call(mgr, &self.args, no_remote)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handler", &self.handler.name())
            .field("args", &self.args.len())
            .field("provenance", &self.provenance)
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event {}({})",
            self.handler.name(),
            describe_args(&self.args)
        )
    }
}
