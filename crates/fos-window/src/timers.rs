//! Timer APIs
//!
//! Task queue and `setTimeout` on a virtual clock. Time only moves when the
//! owner calls [`Scheduler::advance_to`], which keeps runs deterministic.

use crate::Window;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Unit of deferred work
pub type Task = Box<dyn FnOnce(&Window)>;

/// Timer handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

/// Timer entry
struct Timer {
    due: Duration,
    task: Task,
}

/// Task and timer queues
#[derive(Default)]
pub struct Scheduler {
    now: Duration,
    next_timer: u32,
    timers: HashMap<TimerId, Timer>,
    tasks: VecDeque<Task>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("timers", &self.timers.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a task
    pub fn queue_task(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Take the oldest queued task
    pub fn pop_task(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(id, Timer {
            due: self.now + delay,
            task,
        });
        id
    }

    /// Clear a timer. Returns false if it already ran or never existed.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Remove the earliest timer due at or before `limit` and move the
    /// clock to its due time. Ties fire in registration order.
    pub fn pop_due(&mut self, limit: Duration) -> Option<Task> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(id, t)| (t.due, **id))?;
        let timer = self.timers.remove(&id)?;
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Check if there are pending timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
