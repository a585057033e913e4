//! The scheduler context: thread records, wait queues, and donation
//! propagation.
//!
//! [`Scheduler`] owns the whole wait graph in two arenas and is the only
//! path to mutating it. Exclusive access is the concurrency model: every
//! operation takes `&mut self`, returns synchronously, and never blocks or
//! suspends the caller — this is the mechanism locks and condition variables
//! are built *on top of*, so it cannot itself depend on one. Parallel
//! callers serialize externally.
//!
//! The donation invariant maintained across all mutations:
//!
//! - a queue's `donation` is the policy aggregate of its waiters' effective
//!   priorities (0 for queues that do not transfer priority), and
//! - a thread's `effective` priority is the policy aggregate of its base
//!   priority and the donations of every queue it owns.
//!
//! The two definitions are mutually recursive through the ownership and
//! waiting edges. [`Scheduler::propagate`] restores both after a mutation by
//! walking up the waits-for chain iteratively — thread, queue it waits on,
//! that queue's owner, and so on — stopping at the first node whose cached
//! value comes out unchanged. The walk terminates because the caller
//! guarantees the graph is acyclic (a circular wait is a contract violation
//! with undefined behavior; detecting one is explicitly not this module's
//! job).

mod queue;
mod record;

use crate::error::SchedError;
use crate::policy::{Candidate, LotteryPolicy, PriorityPolicy, SelectionPolicy};
use crate::types::{Priority, QueueId, ThreadId};
use crate::util::{Arena, XorShift64};
use queue::WaitQueue;
use record::ThreadRecord;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Result alias for scheduler operations.
pub type Result<T> = core::result::Result<T, SchedError>;

/// A node in the donation propagation walk.
#[derive(Clone, Copy)]
enum Node {
    Thread(ThreadId),
    Queue(QueueId),
}

/// The scheduling context for one system: all thread records, all wait
/// queues, and the selection policy that ties them together.
///
/// Handles returned by [`create_thread`](Self::create_thread) and
/// [`create_queue`](Self::create_queue) are only meaningful for the
/// scheduler that minted them; a stale or foreign handle is rejected with
/// [`SchedError::UnknownThread`] / [`SchedError::UnknownQueue`].
#[derive(Debug)]
pub struct Scheduler<P: SelectionPolicy> {
    policy: P,
    threads: Arena<ThreadRecord>,
    queues: Arena<WaitQueue>,
    rng: XorShift64,
    next_seq: u64,
}

/// Scheduler specialized to the deterministic highest-priority policy.
pub type PriorityScheduler = Scheduler<PriorityPolicy>;

/// Scheduler specialized to the ticket-weighted lottery policy.
pub type LotteryScheduler = Scheduler<LotteryPolicy>;

impl PriorityScheduler {
    /// Creates a scheduler with the deterministic priority-max policy.
    #[must_use]
    pub fn deterministic() -> Self {
        Self::new(PriorityPolicy)
    }
}

impl LotteryScheduler {
    /// Creates a lottery scheduler with an OS-entropy draw seed.
    #[must_use]
    pub fn lottery() -> Self {
        Self::new(LotteryPolicy)
    }

    /// Creates a lottery scheduler with a fixed draw seed, for reproducible
    /// runs.
    #[must_use]
    pub fn lottery_with_seed(seed: u64) -> Self {
        Self::with_seed(LotteryPolicy, seed)
    }
}

impl<P: SelectionPolicy> Scheduler<P> {
    /// Creates a scheduler with the given policy, seeding the draw RNG from
    /// OS entropy.
    #[must_use]
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            threads: Arena::new(),
            queues: Arena::new(),
            rng: XorShift64::from_entropy(),
            next_seq: 0,
        }
    }

    /// Creates a scheduler with the given policy and a fixed RNG seed.
    #[must_use]
    pub fn with_seed(policy: P, seed: u64) -> Self {
        Self {
            policy,
            threads: Arena::new(),
            queues: Arena::new(),
            rng: XorShift64::new(seed),
            next_seq: 0,
        }
    }

    // === Lifecycle ===

    /// Registers a new thread at the policy's default base priority.
    pub fn create_thread(&mut self) -> ThreadId {
        let base = self.policy.default_priority();
        let id = ThreadId::from_arena(self.threads.insert(ThreadRecord::new(base)));
        trace!(thread = %id, base, "thread created");
        id
    }

    /// Registers a new thread at the given base priority.
    pub fn create_thread_with_priority(&mut self, priority: Priority) -> Result<ThreadId> {
        self.validate_priority(priority)?;
        let id = ThreadId::from_arena(self.threads.insert(ThreadRecord::new(priority)));
        trace!(thread = %id, base = priority, "thread created");
        Ok(id)
    }

    /// Creates a new resource wait queue.
    ///
    /// When `transfers_priority` is false the queue still tracks ownership
    /// for mutual exclusion but never contributes donation to its owner.
    pub fn create_queue(&mut self, transfers_priority: bool) -> QueueId {
        let id = QueueId::from_arena(self.queues.insert(WaitQueue::new(transfers_priority)));
        trace!(queue = %id, transfers_priority, "queue created");
        id
    }

    /// Removes a thread record. Rejected while the thread waits on or owns
    /// any queue; the handle is invalid afterwards.
    pub fn retire_thread(&mut self, thread: ThreadId) -> Result<()> {
        if self.thread(thread)?.is_wired() {
            return Err(SchedError::ThreadBusy(thread));
        }
        self.threads.remove(thread.arena_index());
        trace!(thread = %thread, "thread retired");
        Ok(())
    }

    /// Removes a wait queue. Rejected while it has an owner or waiters; the
    /// handle is invalid afterwards.
    pub fn retire_queue(&mut self, queue: QueueId) -> Result<()> {
        if self.queue(queue)?.is_in_use() {
            return Err(SchedError::QueueBusy(queue));
        }
        self.queues.remove(queue.arena_index());
        trace!(queue = %queue, "queue retired");
        Ok(())
    }

    // === Priorities ===

    /// Returns the thread's assigned base priority.
    pub fn base_priority(&self, thread: ThreadId) -> Result<Priority> {
        Ok(self.thread(thread)?.base)
    }

    /// Returns the thread's effective priority: its base aggregated with
    /// the donations of every queue it owns.
    pub fn effective_priority(&self, thread: ThreadId) -> Result<Priority> {
        Ok(self.thread(thread)?.effective)
    }

    /// Sets the thread's base priority and propagates the change through
    /// the wait graph.
    ///
    /// Rejected with [`SchedError::InvalidPriority`] outside the policy's
    /// valid range, leaving all state unchanged. Setting the current value
    /// is a no-op.
    pub fn set_base_priority(&mut self, thread: ThreadId, priority: Priority) -> Result<()> {
        self.validate_priority(priority)?;
        let record = self.thread_mut(thread)?;
        if record.base == priority {
            return Ok(());
        }
        record.base = priority;
        trace!(thread = %thread, base = priority, "base priority changed");
        self.propagate(Node::Thread(thread));
        Ok(())
    }

    /// Raises the base priority by one. Returns `false` (and changes
    /// nothing) if the thread is already at the policy maximum.
    pub fn increase_priority(&mut self, thread: ThreadId) -> Result<bool> {
        let base = self.base_priority(thread)?;
        let (_, max) = self.policy.bounds();
        if base == max {
            return Ok(false);
        }
        self.set_base_priority(thread, base + 1)?;
        Ok(true)
    }

    /// Lowers the base priority by one. Returns `false` (and changes
    /// nothing) if the thread is already at the policy minimum.
    pub fn decrease_priority(&mut self, thread: ThreadId) -> Result<bool> {
        let base = self.base_priority(thread)?;
        let (min, _) = self.policy.bounds();
        if base == min {
            return Ok(false);
        }
        self.set_base_priority(thread, base - 1)?;
        Ok(true)
    }

    // === Queue operations ===

    /// Adds `thread` to the queue's waiter set.
    ///
    /// The thread must not already be waiting anywhere (a thread waits on
    /// at most one queue). The queue's donation is recomputed and, for
    /// transferring queues, propagated to the owner and up the chain.
    ///
    /// Enqueueing a thread onto a queue it transitively owns creates a
    /// circular wait, which the caller has contracted never to do.
    pub fn enqueue_waiter(&mut self, queue: QueueId, thread: ThreadId) -> Result<()> {
        self.queue(queue)?;
        if let Some(on) = self.thread(thread)?.waiting_on {
            return Err(SchedError::AlreadyWaiting { thread, on });
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let record = self
            .threads
            .get_mut(thread.arena_index())
            .expect("validated above");
        record.waiting_on = Some(queue);
        record.enqueued_at = seq;
        self.queues
            .get_mut(queue.arena_index())
            .expect("validated above")
            .waiters
            .push(thread);

        trace!(thread = %thread, queue = %queue, seq, "waiter enqueued");
        self.propagate(Node::Queue(queue));
        Ok(())
    }

    /// Grants ownership of an unowned queue directly, without going through
    /// [`dequeue_next`](Self::dequeue_next) — the first acquisition of an
    /// uncontended lock.
    ///
    /// Ownership is recorded even for non-transferring queues; only the
    /// donation side effects are skipped for those.
    pub fn assign_owner(&mut self, queue: QueueId, thread: ThreadId) -> Result<()> {
        let q = self.queue(queue)?;
        if let Some(owner) = q.owner {
            return Err(SchedError::QueueOwned { queue, owner });
        }
        if q.waiters.contains(&thread) {
            return Err(SchedError::OwnerIsWaiter { thread, queue });
        }
        self.thread(thread)?;
        self.grant_ownership(queue, thread);
        Ok(())
    }

    /// Releases the queue from its current owner and hands it to the waiter
    /// the policy selects, or to nobody if the queue is empty.
    ///
    /// The previous owner loses the queue's donation (its effective
    /// priority drops back toward base plus whatever it still owns). The
    /// selected thread is returned for the caller to make runnable; no
    /// context switch happens here.
    pub fn dequeue_next(&mut self, queue: QueueId) -> Result<Option<ThreadId>> {
        self.queue(queue)?;

        // Detach the current owner first so its donation is gone before the
        // winner aggregates the remaining waiters.
        let q = self.queues.get_mut(queue.arena_index()).expect("validated");
        let transfers = q.transfers_priority;
        if let Some(owner) = q.owner.take() {
            debug!(thread = %owner, queue = %queue, "ownership released");
            self.threads
                .get_mut(owner.arena_index())
                .expect("owner record is live")
                .drop_owned(queue);
            if transfers {
                self.propagate(Node::Thread(owner));
            }
        }

        let (ids, candidates) = self.candidates(queue);
        let Some(idx) = self.policy.pick(&candidates, &mut self.rng) else {
            return Ok(None);
        };
        let winner = ids[idx];

        self.queues
            .get_mut(queue.arena_index())
            .expect("validated")
            .remove_waiter(winner);
        self.threads
            .get_mut(winner.arena_index())
            .expect("waiter record is live")
            .waiting_on = None;

        // Donation for the reduced waiter set; the queue is ownerless at
        // this point so the walk stops there.
        self.propagate(Node::Queue(queue));
        self.grant_ownership(queue, winner);

        trace!(thread = %winner, queue = %queue, "waiter dequeued");
        Ok(Some(winner))
    }

    /// Returns the thread [`dequeue_next`](Self::dequeue_next) would select,
    /// without modifying anything.
    ///
    /// Under the lottery policy the draw comes from a clone of the RNG, so
    /// peeking does not perturb the stream and the `dequeue_next` that
    /// follows agrees with the peek.
    pub fn peek_next(&self, queue: QueueId) -> Result<Option<ThreadId>> {
        self.queue(queue)?;
        let (ids, candidates) = self.candidates(queue);
        let mut rng = self.rng.clone();
        Ok(self.policy.pick(&candidates, &mut rng).map(|idx| ids[idx]))
    }

    /// Removes a specific waiter from the queue — eviction on timeout or
    /// abort, driven by whatever owns the blocked thread's lifetime.
    pub fn remove_waiter(&mut self, queue: QueueId, thread: ThreadId) -> Result<()> {
        self.thread(thread)?;
        let q = self.queue_mut(queue)?;
        if !q.remove_waiter(thread) {
            return Err(SchedError::NotWaiting { thread, queue });
        }
        self.threads
            .get_mut(thread.arena_index())
            .expect("validated above")
            .waiting_on = None;
        trace!(thread = %thread, queue = %queue, "waiter evicted");
        self.propagate(Node::Queue(queue));
        Ok(())
    }

    // === Inspection ===

    /// The thread currently owning the queue, if any.
    pub fn owner_of(&self, queue: QueueId) -> Result<Option<ThreadId>> {
        Ok(self.queue(queue)?.owner)
    }

    /// The queue the thread currently waits on, if any.
    pub fn waiting_on(&self, thread: ThreadId) -> Result<Option<QueueId>> {
        Ok(self.thread(thread)?.waiting_on)
    }

    /// The queue's cached donation value (always 0 for non-transferring
    /// queues).
    pub fn donation_of(&self, queue: QueueId) -> Result<Priority> {
        Ok(self.queue(queue)?.donation)
    }

    /// Number of threads waiting on the queue.
    pub fn waiter_count(&self, queue: QueueId) -> Result<usize> {
        Ok(self.queue(queue)?.waiters.len())
    }

    /// The queue's waiters in enqueue order.
    pub fn waiters_of(&self, queue: QueueId) -> Result<Vec<ThreadId>> {
        Ok(self.queue(queue)?.waiters.clone())
    }

    /// Whether the queue participates in priority transfer.
    pub fn transfers_priority(&self, queue: QueueId) -> Result<bool> {
        Ok(self.queue(queue)?.transfers_priority)
    }

    /// Number of live thread records.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Number of live wait queues.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    // === Internals ===

    fn validate_priority(&self, priority: Priority) -> Result<()> {
        let (min, max) = self.policy.bounds();
        if priority < min || priority > max {
            return Err(SchedError::InvalidPriority { priority, min, max });
        }
        Ok(())
    }

    fn thread(&self, thread: ThreadId) -> Result<&ThreadRecord> {
        self.threads
            .get(thread.arena_index())
            .ok_or(SchedError::UnknownThread(thread))
    }

    fn thread_mut(&mut self, thread: ThreadId) -> Result<&mut ThreadRecord> {
        self.threads
            .get_mut(thread.arena_index())
            .ok_or(SchedError::UnknownThread(thread))
    }

    fn queue(&self, queue: QueueId) -> Result<&WaitQueue> {
        self.queues
            .get(queue.arena_index())
            .ok_or(SchedError::UnknownQueue(queue))
    }

    fn queue_mut(&mut self, queue: QueueId) -> Result<&mut WaitQueue> {
        self.queues
            .get_mut(queue.arena_index())
            .ok_or(SchedError::UnknownQueue(queue))
    }

    /// Records `thread` as the queue's owner. Ownership is tracked in both
    /// directions even for non-transferring queues; only the donation
    /// propagation is conditional (a non-transferring queue's donation is
    /// pinned at 0, so the owner's aggregate never sees it).
    fn grant_ownership(&mut self, queue: QueueId, thread: ThreadId) {
        let q = self.queues.get_mut(queue.arena_index()).expect("queue is live");
        q.owner = Some(thread);
        let transfers = q.transfers_priority;
        debug!(thread = %thread, queue = %queue, transfers, "ownership granted");
        self.threads
            .get_mut(thread.arena_index())
            .expect("owner record is live")
            .owns
            .push(queue);
        if transfers {
            self.propagate(Node::Thread(thread));
        }
    }

    /// Snapshot of the queue's waiters as pick candidates, in enqueue
    /// order.
    fn candidates(&self, queue: QueueId) -> (Vec<ThreadId>, Vec<Candidate>) {
        let q = self.queues.get(queue.arena_index()).expect("queue is live");
        let mut ids = Vec::with_capacity(q.waiters.len());
        let mut candidates = Vec::with_capacity(q.waiters.len());
        for &waiter in &q.waiters {
            let record = self
                .threads
                .get(waiter.arena_index())
                .expect("waiter record is live");
            ids.push(waiter);
            candidates.push(Candidate {
                effective: record.effective,
                enqueued_at: record.enqueued_at,
            });
        }
        (ids, candidates)
    }

    /// Policy aggregate of the thread's base priority and the donations of
    /// the queues it owns.
    fn compute_effective(&self, thread: ThreadId) -> Priority {
        let record = self
            .threads
            .get(thread.arena_index())
            .expect("thread record is live");
        if record.owns.is_empty() {
            return record.base;
        }
        let donations: SmallVec<[Priority; 4]> = record
            .owns
            .iter()
            .map(|&q| {
                self.queues
                    .get(q.arena_index())
                    .expect("owned queue is live")
                    .donation
            })
            .collect();
        self.policy.effective(record.base, &donations)
    }

    /// Policy aggregate of the queue's waiters, or 0 for non-transferring
    /// queues.
    fn compute_donation(&self, queue: QueueId) -> Priority {
        let q = self.queues.get(queue.arena_index()).expect("queue is live");
        if !q.transfers_priority || q.waiters.is_empty() {
            return 0;
        }
        let effectives: SmallVec<[Priority; 8]> = q
            .waiters
            .iter()
            .map(|&t| {
                self.threads
                    .get(t.arena_index())
                    .expect("waiter record is live")
                    .effective
            })
            .collect();
        self.policy.donation(&effectives)
    }

    /// Restores the donation invariant starting at `start`, walking the
    /// waits-for chain iteratively: a thread whose effective priority
    /// changed re-aggregates the queue it waits on; a queue whose donation
    /// changed re-aggregates its owner. The walk stops at the first
    /// unchanged cache. Depth is the length of the live chain; the caller
    /// contract (no circular waits) is what bounds it.
    fn propagate(&mut self, start: Node) {
        let mut node = start;
        loop {
            match node {
                Node::Thread(thread) => {
                    let effective = self.compute_effective(thread);
                    let record = self
                        .threads
                        .get_mut(thread.arena_index())
                        .expect("thread record is live");
                    if record.effective == effective {
                        return;
                    }
                    trace!(thread = %thread, effective, "effective priority updated");
                    record.effective = effective;
                    match record.waiting_on {
                        Some(queue) => node = Node::Queue(queue),
                        None => return,
                    }
                }
                Node::Queue(queue) => {
                    let donation = self.compute_donation(queue);
                    let q = self.queues.get_mut(queue.arena_index()).expect("queue is live");
                    if q.donation == donation {
                        return;
                    }
                    trace!(queue = %queue, donation, "donation updated");
                    q.donation = donation;
                    match q.owner {
                        Some(owner) => node = Node::Thread(owner),
                        None => return,
                    }
                }
            }
        }
    }
}
