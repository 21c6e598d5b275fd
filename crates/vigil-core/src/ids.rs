//! Provenance identifiers attached to every raised event.
//!
//! An event is either raised locally (by an analyzer or by handler code) or
//! received from a remote peer. Analyzer-originated events additionally carry
//! the id of the analyzer instance that raised them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Identifier of a remote peer that events can be received from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub Uuid);

impl PeerId {
    /// Create a new random peer ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an event originated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "peer", rename_all = "lowercase")]
pub enum SourceId {
    /// Raised inside this process.
    #[default]
    Local,
    /// Received from a remote peer.
    Remote(PeerId),
}

impl SourceId {
    /// Whether the event came from a remote peer.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// The remote peer, if any.
    #[must_use]
    pub fn peer(&self) -> Option<PeerId> {
        match self {
            Self::Local => None,
            Self::Remote(peer) => Some(*peer),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote(peer) => write!(f, "remote:{peer}"),
        }
    }
}

static NEXT_ANALYZER_ID: AtomicU32 = AtomicU32::new(1);

/// Identifier of a protocol analyzer instance.
///
/// Events not raised by an analyzer carry `None` in place of an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalyzerId(u32);

impl AnalyzerId {
    /// Wrap a raw analyzer id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Allocate the next process-unique analyzer id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ANALYZER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AnalyzerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
