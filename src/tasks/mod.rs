//! Background execution of email verification tasks.
//!
//! [`TaskQueue`] implements the wizard's [`Scheduler`]: submitted task
//! descriptors are sent over an mpsc channel to a single worker thread and
//! tracked as [`TaskRecord`]s the task list page reads back.
//!
//! ## Runners
//!
//! The worker delegates the actual verification to a [`TaskRunner`]. The
//! shipped [`DryRunRunner`] performs no network I/O and only logs what it
//! would verify; tests inject their own runners.

use std::fmt;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::TaskDescriptor;
use crate::wizard::Scheduler;

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is queued, waiting to start.
    Pending,
    /// Task is currently running.
    Running,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Observable state of one submitted task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier (same as the descriptor's).
    pub id: String,
    /// Store the task runs for.
    pub store: String,
    /// Provider display name.
    pub provider: String,
    /// Email account username.
    pub username: String,
    /// Number of proxies handed to the task.
    pub proxies: usize,
    /// Current status.
    pub status: TaskStatus,
    /// Time when the task was submitted.
    pub created_at: String,
    /// Time when the task started running (if started).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Time when the task finished (if finished).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Error message if the task failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskRecord {
    fn pending(task: &TaskDescriptor) -> Self {
        Self {
            id: task.id().to_string(),
            store: task.store().name.clone(),
            provider: task.provider().display_name().to_string(),
            username: task.username().to_string(),
            proxies: task.proxies().len(),
            status: TaskStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
            started_at: None,
            completed_at: None,
            error: None,
        }
    }
}

/// Executes one verification task. Allows mock injection for tests.
pub trait TaskRunner: Send + Sync {
    /// Runs `task`, returning `Err(message)` on failure.
    fn run(&self, task: &TaskDescriptor) -> Result<(), String>;
}

/// Runner that only logs the verification it would perform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl TaskRunner for DryRunRunner {
    fn run(&self, task: &TaskDescriptor) -> Result<(), String> {
        let provider = task.provider();
        info!(
            task_id = task.id(),
            host = %provider.imap_host,
            port = provider.imap_port,
            username = task.username(),
            "Dry run: skipping IMAP login"
        );
        Ok(())
    }
}

type Records = Arc<RwLock<Vec<TaskRecord>>>;

/// Single-worker task queue.
pub struct TaskQueue {
    /// Every submitted task, oldest first.
    records: Records,
    /// Channel sender for submitted tasks.
    sender: Mutex<Option<mpsc::Sender<TaskDescriptor>>>,
    /// Worker thread handle, joined on drop.
    worker: Option<JoinHandle<()>>,
}

impl TaskQueue {
    /// Creates a queue running tasks with [`DryRunRunner`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(Arc::new(DryRunRunner))
    }

    /// Creates a queue with a custom runner (for testing).
    #[must_use]
    pub fn with_runner(runner: Arc<dyn TaskRunner>) -> Self {
        let records: Records = Arc::new(RwLock::new(Vec::new()));
        let (tx, rx) = mpsc::channel::<TaskDescriptor>();

        let worker_records = Arc::clone(&records);
        let worker = thread::spawn(move || {
            for task in rx {
                process_task(&worker_records, runner.as_ref(), &task);
            }
        });

        Self {
            records,
            sender: Mutex::new(Some(tx)),
            worker: Some(worker),
        }
    }

    /// Snapshot of every task record, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<TaskRecord> {
        read(&self.records).clone()
    }

    /// Gets one task record.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<TaskRecord> {
        read(&self.records).iter().find(|r| r.id == id).cloned()
    }

    /// Number of submitted tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.records).len()
    }

    /// Whether no task was submitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops accepting tasks and waits for the queued ones to finish.
    pub fn shutdown(&mut self) {
        lock(&self.sender).take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Task worker thread panicked");
            }
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Scheduler for TaskQueue {
    fn submit(&self, task: TaskDescriptor) {
        write(&self.records).push(TaskRecord::pending(&task));

        let id = task.id().to_string();
        let sent = match lock(&self.sender).as_ref() {
            Some(sender) => sender.send(task).is_ok(),
            None => false,
        };
        if sent {
            info!(task_id = %id, "Task queued");
        } else {
            warn!(task_id = %id, "Task queue is shut down");
            update(&self.records, &id, |record| {
                record.status = TaskStatus::Failed;
                record.completed_at = Some(chrono::Utc::now().to_rfc3339());
                record.error = Some("task queue is shut down".to_string());
            });
        }
    }
}

fn process_task(records: &Records, runner: &dyn TaskRunner, task: &TaskDescriptor) {
    update(records, task.id(), |record| {
        record.status = TaskStatus::Running;
        record.started_at = Some(chrono::Utc::now().to_rfc3339());
    });
    info!(task_id = task.id(), "Task started");

    let result = runner.run(task);

    update(records, task.id(), |record| {
        record.completed_at = Some(chrono::Utc::now().to_rfc3339());
        match &result {
            Ok(()) => record.status = TaskStatus::Completed,
            Err(message) => {
                record.status = TaskStatus::Failed;
                record.error = Some(message.clone());
            }
        }
    });

    match result {
        Ok(()) => info!(task_id = task.id(), "Task completed"),
        Err(message) => warn!(task_id = task.id(), error = %message, "Task failed"),
    }
}

fn update(records: &Records, id: &str, apply: impl FnOnce(&mut TaskRecord)) {
    if let Some(record) = write(records).iter_mut().find(|r| r.id == id) {
        apply(record);
    }
}

fn read(records: &Records) -> RwLockReadGuard<'_, Vec<TaskRecord>> {
    records.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(records: &Records) -> RwLockWriteGuard<'_, Vec<TaskRecord>> {
    records.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderDescriptor, StoreRef};

    struct FailingRunner;

    impl TaskRunner for FailingRunner {
        fn run(&self, _task: &TaskDescriptor) -> Result<(), String> {
            Err("login rejected".to_string())
        }
    }

    fn descriptor(username: &str) -> TaskDescriptor {
        TaskDescriptor::new(
            StoreRef::new("Shop"),
            Vec::new(),
            ProviderDescriptor::new("gmail", "Gmail", "imap.gmail.com"),
            username.to_string(),
            "secret".to_string(),
        )
    }

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
        assert_eq!(TaskStatus::Running.to_string(), "running");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_submitted_tasks_complete() {
        let mut queue = TaskQueue::new();
        let first = descriptor("a");
        let first_id = first.id().to_string();
        queue.submit(first);
        queue.submit(descriptor("b"));
        queue.shutdown();

        let records = queue.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status == TaskStatus::Completed));
        assert_eq!(records[0].id, first_id);
        assert_eq!(records[0].provider, "Gmail");
        assert!(records[0].started_at.is_some());
        assert!(records[0].completed_at.is_some());
    }

    #[test]
    fn test_runner_failure_is_recorded() {
        let mut queue = TaskQueue::with_runner(Arc::new(FailingRunner));
        let task = descriptor("a");
        let id = task.id().to_string();
        queue.submit(task);
        queue.shutdown();

        let record = queue.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("login rejected"));
    }

    #[test]
    fn test_submit_after_shutdown_fails_the_task() {
        let mut queue = TaskQueue::new();
        queue.shutdown();
        queue.submit(descriptor("late"));

        let records = queue.records();
        assert_eq!(records[0].status, TaskStatus::Failed);
    }
}
