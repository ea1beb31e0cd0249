//! Deterministic deadline queue for session-owned timers.
//!
//! Three periodic processes and the outage chain's deferred stages all live
//! here as cancellable tasks. Tasks fire in (deadline, insertion) order, so
//! interleavings are reproducible, and cancellation is synchronous: once a
//! transition clears the queue, no stale task can fire afterwards.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct TaskId;
}

/// What a due task does. The session dispatches on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    HourTick,
    PowerTick,
    AdversaryTick,
    IntroTimeout,
    OutageReveal,
    OutageBlackout,
    OutageAttack,
}

#[derive(Clone, Copy, Debug)]
struct Task {
    due_at_ms: u64,
    seq: u64,
    kind: TaskKind,
}

/// Pending scheduled work. The set stays tiny (a handful of tasks), so
/// selection is a linear scan rather than a heap.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: SlotMap<TaskId, Task>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, due_at_ms: u64, kind: TaskKind) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(Task { due_at_ms, seq, kind })
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    /// Drop every pending task. Called on any exit from the playing phase
    /// and on session restart.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.values().map(|task| task.due_at_ms).min()
    }

    /// Remove and return the earliest task due at or before `now_ms`.
    /// Equal deadlines resolve by insertion order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TaskKind)> {
        let id = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due_at_ms <= now_ms)
            .min_by_key(|(_, task)| (task.due_at_ms, task.seq))
            .map(|(id, _)| id)?;
        let task = self.tasks.remove(id)?;
        Some((task.due_at_ms, task.kind))
    }
}
