//! Remote forwarding collaborator.
//!
//! Handlers with auto-publish topics hand every locally raised invocation to
//! a [`RemoteForwarder`]. The transport behind it is not part of this crate.

use serde::{Deserialize, Serialize};

use vigil_core::{Val, ValPtr};

use crate::error::ForwardError;

/// Wire-level description of one forwarded invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEvent {
    /// Handler name.
    pub name: String,
    /// Argument values, in order.
    pub args: Vec<Val>,
}

impl RemoteEvent {
    /// Snapshot a handler invocation.
    #[must_use]
    pub fn new(name: &str, args: &[ValPtr]) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|v| Val::clone(v)).collect(),
        }
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Encode`] if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String, ForwardError> {
        serde_json::to_string(self).map_err(|source| ForwardError::Encode {
            name: self.name.clone(),
            source,
        })
    }
}

/// Transport that delivers events to remote peers.
pub trait RemoteForwarder: Send + Sync {
    /// Publish `event` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns a [`ForwardError`] if the event could not be handed off.
    /// Failures are logged by the caller and never abort dispatch.
    fn forward(&self, topic: &str, event: &RemoteEvent) -> Result<(), ForwardError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::args;

    #[test]
    fn test_remote_event_snapshot() {
        let args = args!["alice", true];
        let event = RemoteEvent::new("finger_request", &args);
        assert_eq!(event.name, "finger_request");
        assert_eq!(event.args, vec![Val::from("alice"), Val::Bool(true)]);
    }

    #[test]
    fn test_remote_event_json() {
        let event = RemoteEvent::new("ping", &args![1_u64]);
        let json = event.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"name":"ping","args":[{"type":"count","value":1}]}"#
        );

        let parsed: RemoteEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
