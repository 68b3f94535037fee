//! Cooperative tick scheduler on a virtual clock.
//!
//! Nothing here reads the wall clock. The caller advances time with
//! [`TickScheduler::run_until`], and every task that has fallen due runs in
//! `(due time, registration order)` order. Each task receives the context
//! passed to `run_until` and its own due time, so replaying the same calls
//! reproduces the same run exactly.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tracing::{error, trace};

use crate::SchedulerError;

/// Default number of live tasks a scheduler accepts.
pub const DEFAULT_CAPACITY: usize = 64;

type TaskFn<C> = Box<dyn FnMut(&mut C, Duration)>;

/// Refers to a registered task. Cancelling is safe at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

struct Task<C> {
    handle: TaskHandle,
    due: Duration,
    period: Option<Duration>,
    run: TaskFn<C>,
}

/// Runs fixed-period and one-shot tasks against a shared context `C`.
pub struct TickScheduler<C> {
    tasks: Vec<Task<C>>,
    capacity: usize,
    next_handle: u64,
    now: Duration,
    runs: u64,
    panics: u64,
}

impl<C> TickScheduler<C> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A scheduler that refuses registrations beyond `capacity` live tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::new(),
            capacity,
            next_handle: 0,
            now: Duration::ZERO,
            runs: 0,
            panics: 0,
        }
    }

    /// Virtual time reached by the last [`run_until`](Self::run_until).
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Live tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Task runs so far, panicked runs included.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Task runs that panicked.
    pub fn panics(&self) -> u64 {
        self.panics
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    /// Run `task` every `period`, first at `first_due`.
    pub fn schedule_repeating(
        &mut self,
        first_due: Duration,
        period: Duration,
        task: impl FnMut(&mut C, Duration) + 'static,
    ) -> Result<TaskHandle, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        self.register(first_due, Some(period), Box::new(task))
    }

    /// Run `task` once at `due`.
    pub fn schedule_once(
        &mut self,
        due: Duration,
        task: impl FnMut(&mut C, Duration) + 'static,
    ) -> Result<TaskHandle, SchedulerError> {
        self.register(due, None, Box::new(task))
    }

    /// Remove a task. Returns `false` if it had already fired or been cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.tasks.iter().position(|task| task.handle == handle) {
            Some(index) => {
                self.tasks.remove(index);
                trace!(task = handle.0, "Task cancelled");
                true
            }
            None => false,
        }
    }

    /// Run every task due at or before `now`, advancing the virtual clock.
    ///
    /// Repeating tasks run once per elapsed period. A task that panics is
    /// logged and keeps its schedule; the remaining tasks still run.
    /// Returns the number of task runs.
    pub fn run_until(&mut self, now: Duration, ctx: &mut C) -> usize {
        let mut ran = 0;
        while let Some(index) = self.next_due(now) {
            let task = &mut self.tasks[index];
            let due = task.due;
            let handle = task.handle;
            let period = task.period;
            self.now = self.now.max(due);

            let outcome = catch_unwind(AssertUnwindSafe(|| (task.run)(ctx, due)));
            self.runs += 1;
            ran += 1;
            if outcome.is_err() {
                self.panics += 1;
                error!(task = handle.0, ?due, "Scheduled task panicked");
            }

            match period {
                Some(period) => self.tasks[index].due = due + period,
                None => {
                    self.tasks.remove(index);
                }
            }
        }
        self.now = self.now.max(now);
        ran
    }

    fn register(
        &mut self,
        due: Duration,
        period: Option<Duration>,
        run: TaskFn<C>,
    ) -> Result<TaskHandle, SchedulerError> {
        if self.tasks.len() >= self.capacity {
            return Err(SchedulerError::Exhausted {
                capacity: self.capacity,
            });
        }
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(Task {
            handle,
            due,
            period,
            run,
        });
        trace!(task = handle.0, ?due, ?period, "Task registered");
        Ok(handle)
    }

    /// Index of the earliest due task, ties broken by registration order.
    fn next_due(&self, now: Duration) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= now)
            .min_by_key(|(_, task)| (task.due, task.handle))
            .map(|(index, _)| index)
    }
}

impl<C> Default for TickScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_repeating_task_runs_once_per_period() {
        let mut scheduler = TickScheduler::new();
        let mut count = 0u32;
        scheduler
            .schedule_repeating(ms(40), ms(40), |count: &mut u32, _| *count += 1)
            .unwrap();

        assert_eq!(scheduler.run_until(ms(39), &mut count), 0);
        assert_eq!(scheduler.run_until(ms(40), &mut count), 1);
        assert_eq!(scheduler.run_until(ms(200), &mut count), 4);
        assert_eq!(count, 5);
        assert_eq!(scheduler.now(), ms(200));
    }

    #[test]
    fn test_same_tick_runs_in_registration_order() {
        let mut scheduler = TickScheduler::new();
        let mut log: Vec<&'static str> = Vec::new();
        scheduler
            .schedule_repeating(ms(40), ms(40), |log: &mut Vec<_>, _| log.push("physics"))
            .unwrap();
        scheduler
            .schedule_repeating(ms(40), ms(40), |log: &mut Vec<_>, _| log.push("render"))
            .unwrap();

        scheduler.run_until(ms(80), &mut log);
        assert_eq!(log, vec!["physics", "render", "physics", "render"]);
    }

    #[test]
    fn test_earlier_due_runs_first_regardless_of_registration() {
        let mut scheduler = TickScheduler::new();
        let mut log: Vec<Duration> = Vec::new();
        scheduler
            .schedule_once(ms(30), |log: &mut Vec<_>, due| log.push(due))
            .unwrap();
        scheduler
            .schedule_once(ms(10), |log: &mut Vec<_>, due| log.push(due))
            .unwrap();

        scheduler.run_until(ms(100), &mut log);
        assert_eq!(log, vec![ms(10), ms(30)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent_and_safe_after_firing() {
        let mut scheduler = TickScheduler::new();
        let mut count = 0u32;
        let once = scheduler
            .schedule_once(ms(10), |count: &mut u32, _| *count += 1)
            .unwrap();
        let repeating = scheduler
            .schedule_repeating(ms(10), ms(10), |count: &mut u32, _| *count += 10)
            .unwrap();

        scheduler.run_until(ms(10), &mut count);
        assert_eq!(count, 11);

        assert!(!scheduler.cancel(once));
        assert!(scheduler.cancel(repeating));
        assert!(!scheduler.cancel(repeating));

        scheduler.run_until(ms(100), &mut count);
        assert_eq!(count, 11);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let mut scheduler: TickScheduler<()> = TickScheduler::new();
        let result = scheduler.schedule_repeating(ms(0), Duration::ZERO, |_, _| {});
        assert_eq!(result, Err(SchedulerError::ZeroPeriod));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let mut scheduler: TickScheduler<()> = TickScheduler::with_capacity(2);
        scheduler.schedule_once(ms(1), |_, _| {}).unwrap();
        scheduler.schedule_once(ms(2), |_, _| {}).unwrap();
        let result = scheduler.schedule_once(ms(3), |_, _| {});
        assert_eq!(result, Err(SchedulerError::Exhausted { capacity: 2 }));

        // Capacity frees up once tasks fire.
        scheduler.run_until(ms(2), &mut ());
        assert!(scheduler.schedule_once(ms(3), |_, _| {}).is_ok());
    }

    #[test]
    fn test_panicking_task_does_not_stop_others() {
        let mut scheduler = TickScheduler::new();
        let mut count = 0u32;
        scheduler
            .schedule_repeating(ms(10), ms(10), |_: &mut u32, _| panic!("faulty task"))
            .unwrap();
        scheduler
            .schedule_repeating(ms(10), ms(10), |count: &mut u32, _| *count += 1)
            .unwrap();

        scheduler.run_until(ms(30), &mut count);
        assert_eq!(count, 3);
        assert_eq!(scheduler.panics(), 3);
        assert_eq!(scheduler.runs(), 6);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_task_receives_its_due_time() {
        let mut scheduler = TickScheduler::new();
        let mut seen: Vec<Duration> = Vec::new();
        scheduler
            .schedule_repeating(ms(5), ms(20), |seen: &mut Vec<_>, due| seen.push(due))
            .unwrap();

        scheduler.run_until(ms(70), &mut seen);
        assert_eq!(seen, vec![ms(5), ms(25), ms(45), ms(65)]);
    }
}
