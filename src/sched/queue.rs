//! Per-resource wait-queue state.

use crate::types::{Priority, ThreadId};

/// The state of one contended resource: its owner, the threads waiting for
/// it, and the cached donation its waiters contribute to the owner.
///
/// `waiters` preserves insertion order; selection order is reconstructed at
/// pick time from the waiters' current effective priorities and enqueue
/// stamps, so a priority change never has to re-sort anything here.
#[derive(Debug)]
pub(crate) struct WaitQueue {
    /// Whether this queue participates in priority transfer at all. Fixed
    /// at construction. Queues modeling pure FIFO resources set this false
    /// and never contribute to any owner's effective priority.
    pub(crate) transfers_priority: bool,
    /// The thread currently holding the resource, if any.
    pub(crate) owner: Option<ThreadId>,
    /// Waiting threads in enqueue order.
    pub(crate) waiters: Vec<ThreadId>,
    /// Cached policy aggregate over the waiters' effective priorities.
    /// Always 0 when `transfers_priority` is false.
    pub(crate) donation: Priority,
}

impl WaitQueue {
    pub(crate) const fn new(transfers_priority: bool) -> Self {
        Self {
            transfers_priority,
            owner: None,
            waiters: Vec::new(),
            donation: 0,
        }
    }

    /// True while an owner or any waiter is attached.
    pub(crate) fn is_in_use(&self) -> bool {
        self.owner.is_some() || !self.waiters.is_empty()
    }

    pub(crate) fn remove_waiter(&mut self, thread: ThreadId) -> bool {
        if let Some(pos) = self.waiters.iter().position(|&t| t == thread) {
            // Order-preserving removal: the lottery fallback and the
            // candidate stamps both assume enqueue order survives.
            self.waiters.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ArenaIndex;

    fn thread(n: u32) -> ThreadId {
        ThreadId::from_arena(ArenaIndex::new(n, 0))
    }

    #[test]
    fn remove_waiter_preserves_order() {
        let mut queue = WaitQueue::new(true);
        queue.waiters.extend([thread(0), thread(1), thread(2)]);

        assert!(queue.remove_waiter(thread(1)));
        assert_eq!(queue.waiters, vec![thread(0), thread(2)]);
        assert!(!queue.remove_waiter(thread(1)));
    }

    #[test]
    fn in_use_tracks_owner_and_waiters() {
        let mut queue = WaitQueue::new(false);
        assert!(!queue.is_in_use());

        queue.owner = Some(thread(0));
        assert!(queue.is_in_use());

        queue.owner = None;
        queue.waiters.push(thread(1));
        assert!(queue.is_in_use());
    }
}
