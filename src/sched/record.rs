//! Per-thread scheduling state.

use crate::types::{Priority, QueueId};
use smallvec::SmallVec;

/// The scheduling state of one execution unit: its assigned base priority,
/// the cached effective priority derived from it, the queues it holds, and
/// the single queue it currently waits on, if any.
///
/// The record is pure data; the cross-record bookkeeping (donation
/// aggregation, propagation) lives in [`Scheduler`](super::Scheduler), which
/// owns the arenas both ends of every edge resolve through.
#[derive(Debug)]
pub(crate) struct ThreadRecord {
    /// Caller-assigned priority, bounded by the policy range.
    pub(crate) base: Priority,
    /// Cached aggregate of `base` and the donations of owned queues.
    /// Recomputed, never assigned directly by callers.
    pub(crate) effective: Priority,
    /// Queues this thread currently owns. Most threads hold zero or one.
    pub(crate) owns: SmallVec<[QueueId; 4]>,
    /// The queue this thread waits on, if blocked. At most one.
    pub(crate) waiting_on: Option<QueueId>,
    /// Stamp assigned when the record joined its queue's waiter set; used
    /// only for the deterministic policy's FIFO tie-break.
    pub(crate) enqueued_at: u64,
}

impl ThreadRecord {
    pub(crate) fn new(base: Priority) -> Self {
        Self {
            base,
            effective: base,
            owns: SmallVec::new(),
            waiting_on: None,
            enqueued_at: 0,
        }
    }

    /// True if the record is wired into the wait graph in either direction.
    pub(crate) fn is_wired(&self) -> bool {
        self.waiting_on.is_some() || !self.owns.is_empty()
    }

    pub(crate) fn drop_owned(&mut self, queue: QueueId) {
        if let Some(pos) = self.owns.iter().position(|&q| q == queue) {
            self.owns.swap_remove(pos);
        }
    }
}
