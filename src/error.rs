//! Error types for scheduler operations.
//!
//! Two classes of failure exist: an out-of-range base priority, and caller
//! contract violations (stale handles, double-waiting, claiming an owned
//! queue). Both are programming errors on the caller's side; every rejected
//! operation leaves the donation graph untouched. An empty queue is *not* an
//! error — `dequeue_next` and `peek_next` return `Ok(None)` for the idle
//! resource case.

use crate::types::{Priority, QueueId, ThreadId};
use thiserror::Error;

/// Error type for scheduler operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// Base priority outside the active policy's valid range.
    #[error("priority {priority} outside valid range {min}..={max}")]
    InvalidPriority {
        /// The rejected priority value.
        priority: Priority,
        /// Inclusive lower bound of the policy range.
        min: Priority,
        /// Inclusive upper bound of the policy range.
        max: Priority,
    },

    /// The thread handle is stale or belongs to a different scheduler.
    #[error("unknown thread handle {0}")]
    UnknownThread(ThreadId),

    /// The queue handle is stale or belongs to a different scheduler.
    #[error("unknown queue handle {0}")]
    UnknownQueue(QueueId),

    /// The thread is already waiting on a queue (a thread waits on at most
    /// one queue at a time).
    #[error("thread {thread} is already waiting on {on}")]
    AlreadyWaiting {
        /// The thread that was re-enqueued.
        thread: ThreadId,
        /// The queue it is already waiting on.
        on: QueueId,
    },

    /// The thread is not among the queue's waiters.
    #[error("thread {thread} is not waiting on {queue}")]
    NotWaiting {
        /// The thread named by the caller.
        thread: ThreadId,
        /// The queue it was expected to wait on.
        queue: QueueId,
    },

    /// The queue already has an owner; it must be released through
    /// `dequeue_next` before being claimed directly.
    #[error("queue {queue} is already owned by {owner}")]
    QueueOwned {
        /// The queue being claimed.
        queue: QueueId,
        /// Its current owner.
        owner: ThreadId,
    },

    /// The thread is a waiter of the queue it tried to claim; granting
    /// ownership would create a self-wait.
    #[error("thread {thread} waits on {queue} and cannot own it")]
    OwnerIsWaiter {
        /// The thread that tried to claim the queue.
        thread: ThreadId,
        /// The queue it is waiting on.
        queue: QueueId,
    },

    /// The thread still waits on or owns a queue and cannot be retired.
    #[error("thread {0} is still wired into the wait graph")]
    ThreadBusy(ThreadId),

    /// The queue still has an owner or waiters and cannot be retired.
    #[error("queue {0} is still in use")]
    QueueBusy(QueueId),
}
