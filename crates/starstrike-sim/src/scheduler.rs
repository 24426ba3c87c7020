//! Deadline scheduler for level timers.
//!
//! Every deferred action of a level attempt (spawns, movement completion,
//! boundary polls, firing, completion dispatch) is a timer here. Timers are
//! ordered by (due tick, creation sequence), so equal deadlines fire in the
//! order they were scheduled. Timers owned by an enemy are indexed per enemy
//! so they can be cancelled as a batch when the enemy is retired.

use std::collections::{BTreeMap, HashMap};

use starstrike_core::enums::EnemyType;
use starstrike_core::types::EnemyId;

/// What a timer does when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Spawn the next enemy from the level's spawn list.
    Spawn { enemy_type: EnemyType },
    /// The enemy's trajectory ran to completion.
    MovementComplete { id: EnemyId },
    /// Check whether the enemy crossed the escape line.
    BoundaryPoll { id: EnemyId },
    /// The enemy fires a shot.
    Fire { id: EnemyId },
    /// Deliver the level-complete callback.
    DispatchCompletion,
}

impl TimerTask {
    /// Enemy whose retirement cancels this timer.
    pub fn owner(&self) -> Option<EnemyId> {
        match *self {
            TimerTask::MovementComplete { id }
            | TimerTask::BoundaryPoll { id }
            | TimerTask::Fire { id } => Some(id),
            TimerTask::Spawn { .. } | TimerTask::DispatchCompletion => None,
        }
    }
}

/// Opaque handle used to cancel a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer popped from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub handle: TimerHandle,
    pub due_tick: u64,
    pub task: TimerTask,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    task: TimerTask,
    interval_ticks: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(u64, u64), Timer>,
    due_by_seq: HashMap<u64, u64>,
    by_enemy: HashMap<EnemyId, Vec<u64>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer.
    pub fn schedule_at(&mut self, due_tick: u64, task: TimerTask) -> TimerHandle {
        self.insert(due_tick, task, None)
    }

    /// Schedule a timer that fires at `first_due` and every `interval_ticks`
    /// after that until cancelled. A zero interval is treated as one tick.
    pub fn schedule_repeating(
        &mut self,
        first_due: u64,
        interval_ticks: u64,
        task: TimerTask,
    ) -> TimerHandle {
        self.insert(first_due, task, Some(interval_ticks.max(1)))
    }

    fn insert(&mut self, due_tick: u64, task: TimerTask, interval_ticks: Option<u64>) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.queue.insert((due_tick, seq), Timer { task, interval_ticks });
        self.due_by_seq.insert(seq, due_tick);
        if let Some(id) = task.owner() {
            self.by_enemy.entry(id).or_default().push(seq);
        }
        TimerHandle(seq)
    }

    /// Cancel a single timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let seq = handle.0;
        let Some(due) = self.due_by_seq.remove(&seq) else {
            return false;
        };
        if let Some(timer) = self.queue.remove(&(due, seq)) {
            if let Some(id) = timer.task.owner() {
                self.forget_owned(id, seq);
            }
        }
        true
    }

    /// Cancel every timer owned by `id`. Returns how many were cancelled.
    pub fn cancel_enemy(&mut self, id: EnemyId) -> usize {
        let Some(seqs) = self.by_enemy.remove(&id) else {
            return 0;
        };
        let mut cancelled = 0;
        for seq in seqs {
            if let Some(due) = self.due_by_seq.remove(&seq) {
                self.queue.remove(&(due, seq));
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.due_by_seq.clear();
        self.by_enemy.clear();
    }

    /// Remove and return the earliest timer due at or before `now`.
    /// Repeating timers are re-armed one interval after their due tick.
    pub fn pop_due(&mut self, now: u64) -> Option<DueTimer> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        let timer = self.queue.remove(&(due, seq))?;

        match timer.interval_ticks {
            Some(interval) => {
                let next = due + interval;
                self.queue.insert((next, seq), timer);
                self.due_by_seq.insert(seq, next);
            }
            None => {
                self.due_by_seq.remove(&seq);
                if let Some(id) = timer.task.owner() {
                    self.forget_owned(id, seq);
                }
            }
        }

        Some(DueTimer {
            handle: TimerHandle(seq),
            due_tick: due,
            task: timer.task,
        })
    }

    fn forget_owned(&mut self, id: EnemyId, seq: u64) {
        if let Some(seqs) = self.by_enemy.get_mut(&id) {
            seqs.retain(|&s| s != seq);
            if seqs.is_empty() {
                self.by_enemy.remove(&id);
            }
        }
    }

    /// Number of live timers owned by `id`.
    pub fn pending_for(&self, id: EnemyId) -> usize {
        self.by_enemy.get(&id).map_or(0, Vec::len)
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
