//! Timers and reminders
//!
//! Each scheduled task is its own tokio task that sleeps until its deadline.
//! On waking it removes itself from the registry under the lock and only
//! renders if it was still there, so a task fires at most once and a cancel
//! that wins the race suppresses it.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use tokio::task::AbortHandle;

use crate::background::Background;
use crate::voice::{OutputPipeline, OutputRequest};

/// Finished tasks kept for inspection
const RECENT_LIMIT: usize = 16;

/// Identifies a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskHandle {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Timer,
    Reminder,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::Reminder => f.write_str("reminder"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Fired,
    Cancelled,
}

/// A timer or reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskHandle,
    pub kind: TaskKind,
    pub fire_at: DateTime<Local>,
    pub message: String,
    pub state: TaskState,
}

struct Entry {
    task: ScheduledTask,
    abort: AbortHandle,
}

#[derive(Default)]
struct Tasks {
    active: HashMap<TaskHandle, Entry>,
    recent: VecDeque<ScheduledTask>,
}

impl Tasks {
    fn finish(&mut self, handle: TaskHandle, state: TaskState) -> Option<ScheduledTask> {
        let mut task = self.active.remove(&handle)?.task;
        task.state = state;

        if self.recent.len() == RECENT_LIMIT {
            self.recent.pop_front();
        }
        self.recent.push_back(task.clone());
        Some(task)
    }
}

struct Inner {
    tasks: Mutex<Tasks>,
    next_id: AtomicU64,
    background: Background,
    pipeline: Arc<OutputPipeline>,
}

impl Inner {
    fn tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of pending timers and reminders
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Arc<Inner>,
}

impl TaskRegistry {
    /// Create a registry that announces through `pipeline`
    #[must_use]
    pub fn new(pipeline: Arc<OutputPipeline>, background: Background) -> Self {
        Self {
            inner: Arc::new(Inner {
                tasks: Mutex::new(Tasks::default()),
                next_id: AtomicU64::new(1),
                background,
                pipeline,
            }),
        }
    }

    /// Schedule a timer that renders `message` after `delay`
    pub fn schedule(&self, delay: Duration, message: impl Into<String>) -> TaskHandle {
        self.schedule_with(TaskKind::Timer, delay, message)
    }

    /// Schedule a reminder that renders `message` after `delay`
    pub fn schedule_reminder(&self, delay: Duration, message: impl Into<String>) -> TaskHandle {
        self.schedule_with(TaskKind::Reminder, delay, message)
    }

    pub fn schedule_with(
        &self,
        kind: TaskKind,
        delay: Duration,
        message: impl Into<String>,
    ) -> TaskHandle {
        let handle = TaskHandle(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let now = Local::now();
        let fire_at = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(now);

        let task = ScheduledTask {
            id: handle,
            kind,
            fire_at,
            message: message.into(),
            state: TaskState::Pending,
        };

        // Hold the lock across spawn so the task cannot fire before it is registered
        let mut tasks = self.inner.tasks();
        let inner = Arc::clone(&self.inner);
        let join = self.inner.background.spawn("scheduled-task", async move {
            tokio::time::sleep(delay).await;

            let fired = inner.tasks().finish(handle, TaskState::Fired);
            if let Some(task) = fired {
                tracing::info!(task = %handle, kind = %task.kind, "scheduled task fired");
                inner.pipeline.render(OutputRequest::alert(task.message)).await;
            }
        });

        tracing::info!(task = %handle, %kind, delay_secs = delay.as_secs(), "scheduled task");
        tasks.active.insert(
            handle,
            Entry {
                task,
                abort: join.abort_handle(),
            },
        );
        handle
    }

    /// Cancel a pending task
    ///
    /// Returns false if the task already fired, was cancelled, or never existed.
    pub fn cancel(&self, handle: TaskHandle) -> bool {
        let mut tasks = self.inner.tasks();
        let abort = match tasks.active.get(&handle) {
            Some(entry) => entry.abort.clone(),
            None => return false,
        };
        abort.abort();
        tasks.finish(handle, TaskState::Cancelled);
        tracing::info!(task = %handle, "scheduled task cancelled");
        true
    }

    /// Cancel every pending task, returning how many were cancelled
    pub fn cancel_all(&self) -> usize {
        let mut tasks = self.inner.tasks();
        let handles: Vec<TaskHandle> = tasks.active.keys().copied().collect();
        for handle in &handles {
            if let Some(entry) = tasks.active.get(handle) {
                entry.abort.abort();
            }
            tasks.finish(*handle, TaskState::Cancelled);
        }
        if !handles.is_empty() {
            tracing::info!(count = handles.len(), "cancelled all scheduled tasks");
        }
        handles.len()
    }

    /// Pending tasks, soonest first
    #[must_use]
    pub fn active(&self) -> Vec<ScheduledTask> {
        let mut active: Vec<ScheduledTask> = self
            .inner
            .tasks()
            .active
            .values()
            .map(|entry| entry.task.clone())
            .collect();
        active.sort_by_key(|task| (task.fire_at, task.id));
        active
    }

    /// Recently fired or cancelled tasks, oldest first
    #[must_use]
    pub fn recent(&self) -> Vec<ScheduledTask> {
        self.inner.tasks().recent.iter().cloned().collect()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.inner.tasks().active.contains_key(&handle)
    }
}
