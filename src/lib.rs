//! donorq: a priority-donating resource wait-queue scheduler.
//!
//! # Overview
//!
//! donorq decides which waiting thread gains access to a contended resource
//! next, while propagating priority ("donation") along chains of resource
//! ownership so a low-priority holder cannot indefinitely block a
//! high-priority waiter. It is in-process control-flow infrastructure for
//! synchronization primitives — locks, condition variables, join barriers —
//! not a thread runtime: it never context-switches, blocks, or touches any
//! execution state. Every decision is returned to the caller, who makes the
//! selected thread runnable.
//!
//! Two selection policies share the donation machinery:
//!
//! - [`PriorityPolicy`]: deterministic. Donation is the *maximum* effective
//!   priority among waiters; the pick is the highest-priority waiter, FIFO
//!   within a priority band. Priorities range over `0..=7`.
//! - [`LotteryPolicy`]: probabilistic. Effective priority doubles as a
//!   ticket count, donations *add*, and the pick is a weighted-random draw
//!   proportional to ticket share. Tickets range over the full `u64`.
//!
//! # Example
//!
//! ```
//! use donorq::PriorityScheduler;
//!
//! let mut sched = PriorityScheduler::deterministic();
//! let lock = sched.create_queue(true);
//!
//! let holder = sched.create_thread();
//! let urgent = sched.create_thread();
//! sched.set_base_priority(urgent, 7)?;
//!
//! // `holder` grabs the uncontended lock, then `urgent` blocks on it.
//! sched.assign_owner(lock, holder)?;
//! sched.enqueue_waiter(lock, urgent)?;
//!
//! // The holder now runs at the waiter's priority.
//! assert_eq!(sched.effective_priority(holder)?, 7);
//!
//! // Release: the highest-priority waiter takes the lock, and the old
//! // holder drops back to its own priority.
//! assert_eq!(sched.dequeue_next(lock)?, Some(urgent));
//! assert_eq!(sched.effective_priority(holder)?, 1);
//! # Ok::<(), donorq::SchedError>(())
//! ```
//!
//! # Concurrency contract
//!
//! A scheduler is a single-writer structure: all operations take
//! `&mut Scheduler` and return synchronously. Wrap it in whatever mutual
//! exclusion the surrounding system uses (in a kernel, "preemption
//! disabled" is that region). The wait-for graph must stay acyclic — a
//! thread must never wait, transitively, on a queue it owns; donation
//! propagation does not detect cycles and will not terminate under one.
//!
//! # Module structure
//!
//! - [`sched`]: the [`Scheduler`] context object and its operations
//! - [`policy`]: the [`SelectionPolicy`] trait and the two policies
//! - [`types`]: handles and the [`Priority`] type
//! - [`error`]: the [`SchedError`] taxonomy
//! - [`util`]: arena storage and the deterministic RNG

pub mod error;
pub mod policy;
pub mod sched;
pub mod types;
pub mod util;

pub use error::SchedError;
pub use policy::{Candidate, LotteryPolicy, PriorityPolicy, SelectionPolicy};
pub use sched::{LotteryScheduler, PriorityScheduler, Scheduler};
pub use types::{Priority, QueueId, ThreadId, PRIORITY_DEFAULT, PRIORITY_MAXIMUM, PRIORITY_MINIMUM};
