//! Selection order and priority-range behavior of the deterministic policy.

mod common;

use common::{init_logging, spawn_threads, spawn_with_bases};
use donorq::{PriorityScheduler, SchedError, PRIORITY_MAXIMUM, PRIORITY_MINIMUM};

#[test]
fn fifo_within_a_priority_band() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_threads(&mut sched, 3);

    for &t in &threads {
        sched.enqueue_waiter(q, t).unwrap();
    }

    // Equal priority: strict enqueue order across repeated dequeues.
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[0]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[1]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[2]));
    assert_eq!(sched.dequeue_next(q).unwrap(), None);
}

#[test]
fn highest_priority_wins_across_bands() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_with_bases(&mut sched, &[2, 7, 4, 7]);

    for &t in &threads {
        sched.enqueue_waiter(q, t).unwrap();
    }

    // Both 7s before the 4, which goes before the 2; the 7s in FIFO order.
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[1]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[3]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[2]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[0]));
}

#[test]
fn priority_change_while_waiting_reorders() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_threads(&mut sched, 2);

    sched.enqueue_waiter(q, threads[0]).unwrap();
    sched.enqueue_waiter(q, threads[1]).unwrap();

    // Raising the later waiter moves it ahead of the FIFO order.
    sched.set_base_priority(threads[1], 5).unwrap();
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[1]));
    assert_eq!(sched.dequeue_next(q).unwrap(), Some(threads[0]));
}

#[test]
fn peek_matches_dequeue_and_mutates_nothing() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_with_bases(&mut sched, &[3, 6]);

    for &t in &threads {
        sched.enqueue_waiter(q, t).unwrap();
    }

    let peeked = sched.peek_next(q).unwrap();
    assert_eq!(peeked, Some(threads[1]));
    // State untouched by the peek.
    assert_eq!(sched.waiter_count(q).unwrap(), 2);
    assert_eq!(sched.owner_of(q).unwrap(), None);
    assert_eq!(sched.waiting_on(threads[1]).unwrap(), Some(q));

    assert_eq!(sched.dequeue_next(q).unwrap(), peeked);
}

#[test]
fn boundary_increase_and_decrease() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let t = sched.create_thread();

    sched.set_base_priority(t, PRIORITY_MAXIMUM).unwrap();
    assert_eq!(sched.increase_priority(t).unwrap(), false);
    assert_eq!(sched.base_priority(t).unwrap(), PRIORITY_MAXIMUM);

    sched.set_base_priority(t, PRIORITY_MINIMUM).unwrap();
    assert_eq!(sched.decrease_priority(t).unwrap(), false);
    assert_eq!(sched.base_priority(t).unwrap(), PRIORITY_MINIMUM);

    assert!(sched.increase_priority(t).unwrap());
    assert_eq!(sched.base_priority(t).unwrap(), PRIORITY_MINIMUM + 1);
    assert!(sched.decrease_priority(t).unwrap());
    assert_eq!(sched.base_priority(t).unwrap(), PRIORITY_MINIMUM);
}

#[test]
fn invalid_priority_leaves_state_unchanged() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_threads(&mut sched, 2);

    sched.assign_owner(q, threads[0]).unwrap();
    sched.set_base_priority(threads[1], 4).unwrap();
    sched.enqueue_waiter(q, threads[1]).unwrap();

    let err = sched.set_base_priority(threads[1], 8).unwrap_err();
    assert!(matches!(err, SchedError::InvalidPriority { priority: 8, .. }));

    // Neither the waiter nor the donation it feeds moved.
    assert_eq!(sched.base_priority(threads[1]).unwrap(), 4);
    assert_eq!(sched.effective_priority(threads[1]).unwrap(), 4);
    assert_eq!(sched.donation_of(q).unwrap(), 4);
    assert_eq!(sched.effective_priority(threads[0]).unwrap(), 4);
}

#[test]
fn remove_waiter_evicts_and_recomputes() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q = sched.create_queue(true);
    let threads = spawn_with_bases(&mut sched, &[1, 7, 3]);

    sched.assign_owner(q, threads[0]).unwrap();
    sched.enqueue_waiter(q, threads[1]).unwrap();
    sched.enqueue_waiter(q, threads[2]).unwrap();
    assert_eq!(sched.effective_priority(threads[0]).unwrap(), 7);

    // Evicting the high-priority waiter (timeout path) drops the donation
    // to the remaining waiter's level.
    sched.remove_waiter(q, threads[1]).unwrap();
    assert_eq!(sched.waiting_on(threads[1]).unwrap(), None);
    assert_eq!(sched.donation_of(q).unwrap(), 3);
    assert_eq!(sched.effective_priority(threads[0]).unwrap(), 3);

    assert_eq!(
        sched.remove_waiter(q, threads[1]),
        Err(SchedError::NotWaiting {
            thread: threads[1],
            queue: q
        })
    );
}

#[test]
fn evicted_thread_can_requeue_elsewhere() {
    init_logging();
    let mut sched = PriorityScheduler::deterministic();
    let q1 = sched.create_queue(true);
    let q2 = sched.create_queue(true);
    let t = sched.create_thread();

    sched.enqueue_waiter(q1, t).unwrap();
    sched.remove_waiter(q1, t).unwrap();
    sched.enqueue_waiter(q2, t).unwrap();
    assert_eq!(sched.waiting_on(t).unwrap(), Some(q2));
}
