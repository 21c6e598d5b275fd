//! Finger protocol analyzer.
//!
//! Each originator line is a query, optionally prefixed with `/W` to ask
//! for the long format, naming `user`, `user@host` or nothing. Every
//! responder line is a reply line.

use std::sync::Arc;
use tracing::debug;

use vigil_core::{AnalyzerId, Val};
use vigil_events::{EventHandlerPtr, EventMgr, EventRegistry};

use crate::analyzer::Analyzer;
use crate::connection::Connection;
use crate::content_line::ContentLine;

/// Event raised for each request line: `(c, full, username, hostname)`.
pub const FINGER_REQUEST: &str = "finger_request";

/// Event raised for each reply line: `(c, reply_line)`.
pub const FINGER_REPLY: &str = "finger_reply";

/// Longest originator line accepted in one piece.
pub const MAX_REQUEST_LINE: usize = 1000;

/// Line-oriented Finger analyzer.
pub struct FingerAnalyzer {
    id: AnalyzerId,
    conn: Arc<Connection>,
    mgr: Arc<EventMgr>,
    finger_request: EventHandlerPtr,
    finger_reply: EventHandlerPtr,
    orig_lines: ContentLine,
    resp_lines: ContentLine,
    did_deliver: bool,
    finished: bool,
}

impl std::fmt::Debug for FingerAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerAnalyzer")
            .field("id", &self.id)
            .field("conn", &self.conn.uid())
            .field("did_deliver", &self.did_deliver)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl FingerAnalyzer {
    /// Attach a Finger analyzer to `conn`.
    ///
    /// Resolves (and marks as raised) the `finger_request` and
    /// `finger_reply` handlers in `registry`.
    #[must_use]
    pub fn new(conn: Arc<Connection>, registry: &EventRegistry, mgr: Arc<EventMgr>) -> Self {
        let finger_request = registry.register(FINGER_REQUEST);
        let finger_reply = registry.register(FINGER_REPLY);
        finger_request.set_used();
        finger_reply.set_used();

        let id = AnalyzerId::next();
        debug!(analyzer = %id, conn = %conn.uid(), "finger analyzer attached");

        Self {
            id,
            conn,
            mgr,
            finger_request,
            finger_reply,
            orig_lines: ContentLine::with_max_line_length(MAX_REQUEST_LINE),
            resp_lines: ContentLine::new(),
            did_deliver: false,
            finished: false,
        }
    }

    fn deliver_line(&mut self, line: &[u8], is_orig: bool) {
        if is_orig {
            self.deliver_request(line);
        } else {
            self.deliver_reply(line);
        }
    }

    fn deliver_request(&mut self, line: &[u8]) {
        if !self.finger_request.is_active() {
            return;
        }

        let line = skip_whitespace(line);
        let full = line.len() >= 2 && line[0] == b'/' && line[1].eq_ignore_ascii_case(&b'w');
        let line = if full { skip_whitespace(&line[2..]) } else { line };

        let (username, hostname) = match line.iter().position(|&b| b == b'@') {
            Some(at) => (&line[..at], &line[at.saturating_add(1)..]),
            None => (line, &line[line.len()..]),
        };

        let args = vec![
            self.conn.conn_val(),
            Val::Bool(full).into_ptr(),
            Val::String(String::from_utf8_lossy(username).into_owned()).into_ptr(),
            Val::String(String::from_utf8_lossy(hostname).into_owned()).into_ptr(),
        ];
        self.enqueue_conn_event(&self.finger_request, args);
        self.did_deliver = true;
    }

    fn deliver_reply(&self, line: &[u8]) {
        if !self.finger_reply.is_active() {
            return;
        }

        let args = vec![
            self.conn.conn_val(),
            Val::String(String::from_utf8_lossy(line).into_owned()).into_ptr(),
        ];
        self.enqueue_conn_event(&self.finger_reply, args);
    }

    /// Whether at least one request line was reported.
    #[must_use]
    pub fn did_deliver(&self) -> bool {
        self.did_deliver
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

impl Analyzer for FingerAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id
    }

    fn name(&self) -> &str {
        "finger"
    }

    fn conn(&self) -> &Arc<Connection> {
        &self.conn
    }

    fn event_mgr(&self) -> &EventMgr {
        &self.mgr
    }

    fn deliver_stream(&mut self, data: &[u8], is_orig: bool) {
        if self.finished || data.is_empty() {
            return;
        }

        let lines = if is_orig {
            self.orig_lines.push(data)
        } else {
            self.resp_lines.push(data)
        };
        for line in lines {
            self.deliver_line(&line, is_orig);
        }
    }

    fn done(&mut self) {
        if self.finished {
            return;
        }

        if let Some(partial) = self.orig_lines.flush() {
            debug!(analyzer = %self.id, conn = %self.conn.uid(), weird = "partial_finger_request", "connection closed mid-request");
            self.deliver_line(&partial, true);
        }
        if let Some(partial) = self.resp_lines.flush() {
            self.deliver_line(&partial, false);
        }

        self.finished = true;
    }
}
