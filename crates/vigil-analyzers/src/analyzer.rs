//! The per-connection analyzer interface.

use std::sync::Arc;

use vigil_core::{AnalyzerId, Args, Cookie};
use vigil_events::{EventHandlerPtr, EventMgr, Provenance};

use crate::connection::Connection;

/// A protocol analyzer attached to one connection.
///
/// Stream data is delivered in order per direction. Events raised from an
/// analyzer carry its [`AnalyzerId`] and hold the connection as cookie, so
/// handlers can tell which analyzer produced them.
pub trait Analyzer: Send {
    /// Identifier of this analyzer instance.
    fn id(&self) -> AnalyzerId;

    /// Protocol name, e.g. `"finger"`.
    fn name(&self) -> &str;

    /// The connection this analyzer is attached to.
    fn conn(&self) -> &Arc<Connection>;

    /// The manager events are raised on.
    fn event_mgr(&self) -> &EventMgr;

    /// Deliver reassembled stream bytes for one direction.
    fn deliver_stream(&mut self, data: &[u8], is_orig: bool);

    /// Signal the end of the connection.
    fn done(&mut self) {}

    /// Raise a connection event with this analyzer's provenance.
    fn enqueue_conn_event(&self, handler: &EventHandlerPtr, args: Args) {
        let provenance = Provenance::local()
            .with_analyzer(self.id())
            .with_cookie(Cookie::borrow_from(self.conn()));
        self.event_mgr().enqueue(handler, args, provenance);
    }
}
