//! Deferred actions on a virtual clock.
//!
//! Nothing here reads wall-clock time. Callers move the clock forward with
//! [`Scheduler::advance`] and receive whatever actions fell due, which keeps
//! delayed behaviour deterministic under test.

use tracing::trace;

/// Cancellation token for a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A queued action as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub handle: TimerHandle,
    pub due_at: u64,
}

#[derive(Debug)]
struct ScheduledTask<A> {
    id: u64,
    due_at: u64,
    order: u64,
    action: A,
}

#[derive(Debug)]
pub struct Scheduler<A> {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    queue: Vec<ScheduledTask<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_order: 0,
            queue: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queue `action` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, action: A) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        let due_at = self.now_ms.saturating_add(delay_ms);

        self.queue.push(ScheduledTask {
            id,
            due_at,
            order,
            action,
        });
        trace!(id, due_at, "Scheduled timer");
        TimerHandle(id)
    }

    /// Drop a queued action. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|task| task.id != handle.0);
        let cancelled = self.queue.len() != before;
        trace!(id = handle.0, cancelled, "Cancel timer");
        cancelled
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.iter().any(|task| task.id == handle.0)
    }

    /// Queued actions, earliest first.
    pub fn pending(&self) -> Vec<PendingTimer> {
        let mut tasks: Vec<&ScheduledTask<A>> = self.queue.iter().collect();
        tasks.sort_by_key(|task| (task.due_at, task.order));
        tasks
            .into_iter()
            .map(|task| PendingTimer {
                handle: TimerHandle(task.id),
                due_at: task.due_at,
            })
            .collect()
    }

    /// Move the clock forward and return the actions that fell due, in due
    /// order (ties broken by scheduling order).
    pub fn advance(&mut self, delta_ms: u64) -> Vec<A> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);

        let now = self.now_ms;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|task| task.due_at <= now);
        self.queue = waiting;

        due.sort_by_key(|task| (task.due_at, task.order));
        trace!(now, ran = due.len(), "Advanced clock");
        due.into_iter().map(|task| task.action).collect()
    }
}
