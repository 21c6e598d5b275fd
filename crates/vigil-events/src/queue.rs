//! FIFO storage for pending event records.

use std::collections::VecDeque;

use crate::event::Event;

/// Ordered queue of pending records with its dispatch counters.
///
/// Appends go to the tail and pops come from the head, both O(1).
/// `num_queued - num_dispatched` equals the live length whenever no record
/// is in flight.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
    num_queued: u64,
    num_dispatched: u64,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail.
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
        self.num_queued = self.num_queued.wrapping_add(1);
    }

    /// Remove the record at the head.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Count a popped record as dispatched.
    pub fn mark_dispatched(&mut self) {
        self.num_dispatched = self.num_dispatched.wrapping_add(1);
        debug_assert!(
            self.num_dispatched <= self.num_queued,
            "more events dispatched than queued"
        );
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total records ever queued.
    #[must_use]
    pub fn num_queued(&self) -> u64 {
        self.num_queued
    }

    /// Total records dispatched from the queue.
    #[must_use]
    pub fn num_dispatched(&self) -> u64 {
        self.num_dispatched
    }

    /// Queued but not yet dispatched.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.num_queued.saturating_sub(self.num_dispatched)
    }

    /// Pending records, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
