//! Ticket-weighted (lottery) selection.

use super::{Candidate, SelectionPolicy};
use crate::types::{Priority, PRIORITY_MINIMUM};
use crate::util::XorShift64;

/// Weighted-random selection where effective priority doubles as a ticket
/// count.
///
/// Donation is the *sum* of the waiters' effective priorities rather than
/// the maximum: the combined ticket pressure of everyone stuck behind the
/// owner. The pick draws uniformly from `[0, total_tickets)` and walks the
/// candidates in enqueue order, subtracting each ticket count until the
/// remainder goes negative, which makes each waiter's win probability
/// exactly its ticket share.
///
/// Ticket counts can be large (billions), so no per-ticket state is ever
/// materialized and all aggregation saturates instead of overflowing. Valid
/// base priorities are `0..=u64::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LotteryPolicy;

impl SelectionPolicy for LotteryPolicy {
    fn bounds(&self) -> (Priority, Priority) {
        (PRIORITY_MINIMUM, Priority::MAX)
    }

    fn donation(&self, waiter_effectives: &[Priority]) -> Priority {
        waiter_effectives
            .iter()
            .fold(0, |acc: Priority, &t| acc.saturating_add(t))
    }

    fn effective(&self, base: Priority, donations: &[Priority]) -> Priority {
        donations
            .iter()
            .fold(base, |acc, &d| acc.saturating_add(d))
    }

    fn pick(&self, candidates: &[Candidate], rng: &mut XorShift64) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }

        let total: Priority = candidates
            .iter()
            .fold(0, |acc: Priority, c| acc.saturating_add(c.effective));

        // Effective priority is normally bounded below by the default of 1,
        // but a zero total is reachable when every waiter's base was set to
        // 0. Fall back to the earliest-inserted waiter rather than divide
        // by zero.
        if total == 0 {
            return Some(0);
        }

        let mut draw = rng.next_below(total);
        for (idx, candidate) in candidates.iter().enumerate() {
            match draw.checked_sub(candidate.effective) {
                Some(rest) => draw = rest,
                None => return Some(idx),
            }
        }
        Some(0)
    }
}
