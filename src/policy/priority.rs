//! Deterministic highest-priority selection.

use super::{Candidate, SelectionPolicy};
use crate::types::{Priority, PRIORITY_MAXIMUM, PRIORITY_MINIMUM};
use crate::util::XorShift64;

/// Strict priority selection with FIFO tie-break.
///
/// Donation is the maximum effective priority among waiters, so an owner is
/// boosted exactly to the level of its most urgent waiter. The pick is the
/// waiter with the greatest `(effective, -enqueued_at)`: highest priority
/// wins, and within a priority band the earliest-enqueued waiter wins. This
/// can starve low-priority threads indefinitely; that is the policy's
/// documented behavior, not a defect.
///
/// Valid base priorities are `0..=7`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityPolicy;

impl SelectionPolicy for PriorityPolicy {
    fn bounds(&self) -> (Priority, Priority) {
        (PRIORITY_MINIMUM, PRIORITY_MAXIMUM)
    }

    fn donation(&self, waiter_effectives: &[Priority]) -> Priority {
        waiter_effectives.iter().copied().max().unwrap_or(0)
    }

    fn effective(&self, base: Priority, donations: &[Priority]) -> Priority {
        donations
            .iter()
            .copied()
            .fold(base, Priority::max)
    }

    fn pick(&self, candidates: &[Candidate], _rng: &mut XorShift64) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.effective
                    .cmp(&b.effective)
                    .then(b.enqueued_at.cmp(&a.enqueued_at))
            })
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(effective: Priority, enqueued_at: u64) -> Candidate {
        Candidate {
            effective,
            enqueued_at,
        }
    }

    #[test]
    fn donation_is_max_of_waiters() {
        let policy = PriorityPolicy;
        assert_eq!(policy.donation(&[3, 7, 1]), 7);
        assert_eq!(policy.donation(&[]), 0);
    }

    #[test]
    fn effective_is_max_of_base_and_donations() {
        let policy = PriorityPolicy;
        assert_eq!(policy.effective(2, &[5, 3]), 5);
        assert_eq!(policy.effective(6, &[5, 3]), 6);
        assert_eq!(policy.effective(4, &[]), 4);
    }

    #[test]
    fn pick_prefers_highest_priority() {
        let policy = PriorityPolicy;
        let mut rng = XorShift64::new(1);
        let picked = policy.pick(&[cand(1, 0), cand(7, 1), cand(3, 2)], &mut rng);
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn pick_breaks_ties_by_enqueue_order() {
        let policy = PriorityPolicy;
        let mut rng = XorShift64::new(1);
        let picked = policy.pick(&[cand(5, 10), cand(5, 4), cand(5, 8)], &mut rng);
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn pick_on_empty_set_is_none() {
        let policy = PriorityPolicy;
        let mut rng = XorShift64::new(1);
        assert_eq!(policy.pick(&[], &mut rng), None);
    }
}
