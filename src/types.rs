//! Handle and priority types.
//!
//! Scheduler state lives in arenas owned by the [`Scheduler`] context; the
//! outside world holds only these copyable handles. Each handle wraps a
//! generational arena index, so a handle that outlives its record (or was
//! minted by a different scheduler) fails validation instead of aliasing a
//! reused slot.
//!
//! [`Scheduler`]: crate::sched::Scheduler

use crate::util::ArenaIndex;
use core::fmt;

/// Scheduling priority. Under the lottery policy this doubles as a ticket
/// count.
pub type Priority = u64;

/// The base priority assigned to newly created threads under either policy.
pub const PRIORITY_DEFAULT: Priority = 1;

/// Minimum base priority accepted by the deterministic policy.
pub const PRIORITY_MINIMUM: Priority = 0;

/// Maximum base priority accepted by the deterministic policy.
pub const PRIORITY_MAXIMUM: Priority = 7;

/// A handle to a thread record registered with a scheduler.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub(crate) ArenaIndex);

impl ThreadId {
    pub(crate) const fn from_arena(index: ArenaIndex) -> Self {
        Self(index)
    }

    pub(crate) const fn arena_index(self) -> ArenaIndex {
        self.0
    }
}

impl fmt::Debug for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThreadId({}:{})", self.0.index(), self.0.generation())
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0.index())
    }
}

/// A handle to a resource wait queue registered with a scheduler.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueueId(pub(crate) ArenaIndex);

impl QueueId {
    pub(crate) const fn from_arena(index: ArenaIndex) -> Self {
        Self(index)
    }

    pub(crate) const fn arena_index(self) -> ArenaIndex {
        self.0
    }
}

impl fmt::Debug for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueueId({}:{})", self.0.index(), self.0.generation())
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0.index())
    }
}
