//! Cross-thread wake signal.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// A level-independent "work is pending" signal.
///
/// Any thread may [`fire`](Self::fire) the flare; firing an already armed
/// flare is a no-op. The owner consumes the signal with
/// [`extinguish`](Self::extinguish). Pollers wait for the armed state with
/// [`fired`](Self::fired), which never misses a fire that happens between
/// checking the state and starting to wait.
#[derive(Debug, Default)]
pub struct Flare {
    armed: AtomicBool,
    notify: Notify,
}

impl Flare {
    /// Create a disarmed flare.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the flare and wake a waiting poller.
    pub fn fire(&self) {
        if !self.armed.swap(true, Ordering::AcqRel) {
            self.notify.notify_one();
        }
    }

    /// Disarm the flare. Returns whether it was armed.
    pub fn extinguish(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }

    /// Whether the flare is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Wait until the flare is armed.
    ///
    /// Returns immediately if it already is. Does not disarm it.
    pub async fn fired(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_armed() {
                return;
            }
            notified.await;
        }
    }
}
