//! Connection state shared between analyzers and events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

use vigil_core::{Val, ValPtr};

/// A transport connection as seen by analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    uid: String,
    orig: SocketAddr,
    resp: SocketAddr,
}

impl Connection {
    /// Create a connection record.
    #[must_use]
    pub fn new(uid: impl Into<String>, orig: SocketAddr, resp: SocketAddr) -> Self {
        Self {
            uid: uid.into(),
            orig,
            resp,
        }
    }

    /// Unique connection identifier.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Originator endpoint.
    #[must_use]
    pub fn orig(&self) -> SocketAddr {
        self.orig
    }

    /// Responder endpoint.
    #[must_use]
    pub fn resp(&self) -> SocketAddr {
        self.resp
    }

    /// The `c` argument handed to connection events.
    #[must_use]
    pub fn to_val(&self) -> Val {
        Val::Record(vec![
            ("uid".to_string(), Val::String(self.uid.clone())),
            (
                "id".to_string(),
                Val::Record(vec![
                    ("orig_h".to_string(), Val::Addr(self.orig.ip())),
                    ("orig_p".to_string(), Val::Port(self.orig.port())),
                    ("resp_h".to_string(), Val::Addr(self.resp.ip())),
                    ("resp_p".to_string(), Val::Port(self.resp.port())),
                ]),
            ),
        ])
    }

    /// [`to_val`](Self::to_val) as a shared argument.
    #[must_use]
    pub fn conn_val(&self) -> ValPtr {
        self.to_val().into_ptr()
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.uid, self.orig, self.resp)
    }
}
