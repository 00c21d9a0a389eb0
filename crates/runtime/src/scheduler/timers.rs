//! Deadline bookkeeping for the scheduler worker.
//!
//! The worker never spawns side tasks or sleeps inline; every delayed step
//! becomes a [`TimedTask`] here, and the worker's select loop wakes on the
//! soonest deadline. The queue is a plain vector: sessions hold a handful
//! of pending tasks at most.

use tokio::time::Instant;

use combat_core::ActorId;

/// What to do when a deadline fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TaskKind {
    /// Run the policy's move decision for the active combatant.
    PolicyMove { actor: ActorId },
    /// Run the policy's attack decision and close out the turn.
    PolicyAttack { actor: ActorId },
    /// A movement interpolation finished; confirm arrival.
    FinishMove { actor: ActorId },
    /// A corpse finished lingering; drop it from the state.
    RemoveCorpse { actor: ActorId },
}

/// One scheduled step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TimedTask {
    pub due: Instant,
    /// Session epoch the task belongs to, or `None` for tasks that outlive
    /// the session (corpse removal). Stamped tasks from an earlier epoch
    /// are stale and must be discarded when they fire.
    pub session: Option<u64>,
    pub kind: TaskKind,
}

#[derive(Default)]
pub(crate) struct TaskQueue {
    tasks: Vec<TimedTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: Instant, session: Option<u64>, kind: TaskKind) {
        self.tasks.push(TimedTask { due, session, kind });
    }

    /// The soonest deadline, if any task is pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|task| task.due).min()
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimedTask> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= now)
            .min_by_key(|(_, task)| task.due)
            .map(|(index, _)| index)?;
        Some(self.tasks.swap_remove(index))
    }
}
