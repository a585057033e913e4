//! Selection policies.
//!
//! A policy answers three questions the wait-queue machinery cannot answer
//! on its own: how the priorities of a queue's waiters aggregate into the
//! donation handed to the queue's owner, how a thread's base priority
//! combines with the donations of the queues it owns, and which waiter a
//! `dequeue_next` hands the resource to. Everything else — the waiter sets,
//! the ownership edges, the propagation walk — is shared between policies.
//!
//! [`PriorityPolicy`] takes maxima and picks deterministically;
//! [`LotteryPolicy`] sums tickets and draws at random.

mod lottery;
mod priority;

pub use lottery::LotteryPolicy;
pub use priority::PriorityPolicy;

use crate::types::Priority;
use crate::util::XorShift64;

/// A waiter as seen by [`SelectionPolicy::pick`]: its current effective
/// priority and the stamp assigned when it joined the queue. Candidates are
/// presented in enqueue (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The waiter's effective priority (ticket count under the lottery).
    pub effective: Priority,
    /// Monotone enqueue stamp; smaller means enqueued earlier.
    pub enqueued_at: u64,
}

/// The capability interface a wait queue needs from a selection policy.
///
/// Implementations must be pure functions of their inputs (plus the supplied
/// RNG): the scheduler relies on `donation` and `effective` returning the
/// same value for the same inputs when it checks whether a propagation walk
/// has reached a fixpoint.
pub trait SelectionPolicy {
    /// Inclusive `(min, max)` range of valid base priorities.
    fn bounds(&self) -> (Priority, Priority);

    /// Base priority given to newly created threads.
    fn default_priority(&self) -> Priority {
        crate::types::PRIORITY_DEFAULT
    }

    /// Aggregates the effective priorities of a queue's waiters into the
    /// donation contributed to the queue's owner. Called only for queues
    /// that transfer priority; must return 0 for an empty waiter set.
    fn donation(&self, waiter_effectives: &[Priority]) -> Priority;

    /// Aggregates a thread's base priority with the donations of the queues
    /// it owns into its effective priority.
    fn effective(&self, base: Priority, donations: &[Priority]) -> Priority;

    /// Picks the index of the next waiter to dequeue, or `None` when
    /// `candidates` is empty. `rng` is only consulted by randomized
    /// policies.
    fn pick(&self, candidates: &[Candidate], rng: &mut XorShift64) -> Option<usize>;
}
