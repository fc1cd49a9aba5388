//! Cooperative timer tasks driven by the main loop's elapsed time.
//!
//! Every task belongs to a [`CancellationToken`]. Issuing a new token cancels
//! all outstanding tasks, so a timer armed for a superseded round or screen
//! can never fire into its replacement.

/// Identifies the owner epoch of scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancellationToken(u64);

impl CancellationToken {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

/// How many times a repeating task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

/// A task that came due during [`Scheduler::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub token: CancellationToken,
    pub event: E,
    /// Scheduler clock (ms) at which the task was due.
    pub at_ms: u64,
    /// Firings left after this one (`None` for tasks that repeat forever).
    pub remaining: Option<u32>,
}

#[derive(Debug, Clone)]
struct Task<E> {
    seq: u64,
    token: CancellationToken,
    due_ms: u64,
    interval_ms: u64,
    /// `None` repeats forever.
    remaining: Option<u32>,
    event: E,
}

/// Single-threaded scheduler of one-shot and repeating tasks.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    epoch: u64,
    next_seq: u64,
    tasks: Vec<Task<E>>,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            epoch: 0,
            next_seq: 0,
            tasks: Vec::new(),
        }
    }

    /// Current scheduler clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Cancel every outstanding task and return a fresh token.
    pub fn issue_token(&mut self) -> CancellationToken {
        self.tasks.clear();
        self.epoch += 1;
        CancellationToken(self.epoch)
    }

    /// Whether `token` is the most recently issued one.
    pub fn is_current(&self, token: CancellationToken) -> bool {
        token.0 == self.epoch
    }

    /// Drop all tasks owned by `token`.
    pub fn cancel(&mut self, token: CancellationToken) {
        self.tasks.retain(|task| task.token != token);
    }

    /// Number of tasks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Fire `event` once, `delay_ms` from now. Ignored for stale tokens.
    pub fn schedule_once(&mut self, token: CancellationToken, delay_ms: u64, event: E) {
        self.push(token, delay_ms, delay_ms, Some(1), event);
    }

    /// Fire `event` every `interval_ms`, starting one interval from now.
    /// Ignored for stale tokens and for `Repeat::Times(0)`.
    pub fn schedule_repeating(
        &mut self,
        token: CancellationToken,
        interval_ms: u64,
        repeat: Repeat,
        event: E,
    ) {
        let remaining = match repeat {
            Repeat::Times(0) => return,
            Repeat::Times(n) => Some(n),
            Repeat::Forever => None,
        };
        // A zero interval would fire forever within one advance
        let interval_ms = interval_ms.max(1);
        self.push(token, interval_ms, interval_ms, remaining, event);
    }

    fn push(
        &mut self,
        token: CancellationToken,
        delay_ms: u64,
        interval_ms: u64,
        remaining: Option<u32>,
        event: E,
    ) {
        if !self.is_current(token) {
            return;
        }
        self.next_seq += 1;
        self.tasks.push(Task {
            seq: self.next_seq,
            token,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
            remaining,
            event,
        });
    }

    /// Move the clock forward by `dt_ms` and return every firing in due order.
    ///
    /// Tasks due at the same instant fire in scheduling order.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Fired<E>> {
        let deadline = self.now_ms + dt_ms;
        let mut fired = Vec::new();
        while let Some(next) = self.pop_due(deadline) {
            fired.push(next);
        }
        self.settle(deadline);
        fired
    }

    /// Fire the earliest task due at or before `deadline_ms`, moving the clock
    /// to its due time.
    ///
    /// Callers that schedule from inside a handler use this instead of
    /// [`Scheduler::advance`], so new tasks are timed from the firing instant
    /// and can still come due before the deadline. Finish with
    /// [`Scheduler::settle`].
    pub fn pop_due(&mut self, deadline_ms: u64) -> Option<Fired<E>> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_ms <= deadline_ms)
            .min_by_key(|(_, task)| (task.due_ms, task.seq))
            .map(|(index, _)| index)?;

        let task = &mut self.tasks[index];
        self.now_ms = self.now_ms.max(task.due_ms);
        let remaining = task.remaining.map(|n| n - 1);
        let fired = Fired {
            token: task.token,
            event: task.event.clone(),
            at_ms: task.due_ms,
            remaining,
        };

        if remaining == Some(0) {
            self.tasks.swap_remove(index);
        } else {
            task.remaining = remaining;
            task.due_ms += task.interval_ms;
        }
        Some(fired)
    }

    /// Move the clock to `deadline_ms` once every due task has been popped.
    pub fn settle(&mut self, deadline_ms: u64) {
        self.now_ms = self.now_ms.max(deadline_ms);
    }
}
