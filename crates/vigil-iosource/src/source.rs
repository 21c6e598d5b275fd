//! The pollable-source contract.

use std::time::Duration;

use crate::flare::Flare;

/// Something the [`IoManager`](crate::IoManager) polls.
///
/// A source is ready when its flare is armed or when the timeout it last
/// reported has elapsed. `process` is always called on the loop task.
pub trait IoSource: Send + Sync {
    /// Stable identifying tag for diagnostics.
    fn tag(&self) -> &str;

    /// How long until the source needs to run without being signaled.
    ///
    /// `None` means "no timeout, block until signaled".
    fn next_timeout(&self) -> Option<Duration>;

    /// Do the source's pending work.
    fn process(&self);

    /// The wake signal the loop waits on, if the source has one.
    fn flare(&self) -> Option<&Flare> {
        None
    }

    /// Whether the source still produces work. Closed sources are skipped.
    fn is_open(&self) -> bool {
        true
    }
}
