//! Durable FIFO task queue
//!
//! An in-memory deque mirrored into the task store: every enqueue persists
//! the task first, every successful dequeue is deleted by the pipeline once
//! processing ends. After a crash the store still holds whatever was pending,
//! and `recover` replays it in order at startup.

use crate::core::shutdown::ShutdownCoordinator;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::Task;
use crate::store::TaskStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, Notify};

/// Result of crash recovery at startup
#[derive(Debug, Default)]
pub struct RecoveryOutcome {
    /// Tasks put back on the queue, oldest first
    pub requeued: usize,
    /// Tasks that exhausted their attempts and were dropped; the caller
    /// reports these as failed before discarding them
    pub abandoned: Vec<Task>,
}

pub struct TaskQueue {
    store: Arc<dyn TaskStore>,
    tasks: Mutex<VecDeque<Task>>,
    notify: Notify,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl TaskQueue {
    pub fn new(store: Arc<dyn TaskStore>, shutdown: &ShutdownCoordinator) -> Self {
        Self {
            store,
            tasks: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            shutdown_tx: shutdown.shutdown_tx.clone(),
            shutdown_requested: shutdown.shutdown_requested.clone(),
        }
    }

    fn check_accepting(&self) -> QueueResult<()> {
        if self.shutdown_requested.load(Ordering::Acquire) {
            return Err(QueueError::ShuttingDown);
        }
        Ok(())
    }

    /// Append a task to the back of the queue, persisting it first.
    pub async fn push_back(&self, task: Task) -> QueueResult<()> {
        self.check_accepting()?;
        self.store.save_task(&task)?;
        let mut tasks = self.tasks.lock().await;
        log::debug!("queue push_back: task {} ({})", task.id, task.pull_request_url);
        tasks.push_back(task);
        drop(tasks);
        self.notify.notify_one();
        Ok(())
    }

    /// Put a task at the front of the queue. Used when replaying recovered
    /// tasks so they run before anything enqueued since startup.
    pub async fn push_front(&self, task: Task) -> QueueResult<()> {
        self.check_accepting()?;
        self.store.save_task(&task)?;
        let mut tasks = self.tasks.lock().await;
        log::debug!("queue push_front: task {} ({})", task.id, task.pull_request_url);
        tasks.push_front(task);
        drop(tasks);
        self.notify.notify_one();
        Ok(())
    }

    /// Take the task at the front, waiting until one is available.
    /// Returns `ShuttingDown` once shutdown is signalled and the queue has
    /// been drained of anything it will hand out.
    pub async fn take_front(&self) -> QueueResult<Task> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        loop {
            {
                let mut tasks = self.tasks.lock().await;
                if let Some(task) = tasks.pop_front() {
                    return Ok(task);
                }
            }
            if self.shutdown_requested.load(Ordering::Acquire) {
                return Err(QueueError::ShuttingDown);
            }
            tokio::select! {
                _ = self.notify.notified() => {}
                _ = shutdown_rx.recv() => {}
            }
        }
    }

    /// Remove a task from the in-memory queue without touching the store.
    /// Matching is by task id.
    pub async fn remove(&self, task: &Task) -> bool {
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|t| t != task);
        before != tasks.len()
    }

    /// Delete a finished task from the store.
    pub fn delete(&self, task: &Task) -> QueueResult<()> {
        self.store.delete_task(task.id)?;
        Ok(())
    }

    /// Allocate an id for a task about to be enqueued.
    pub fn next_task_id(&self) -> QueueResult<u64> {
        Ok(self.store.next_task_id()?)
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    /// Replay tasks left in the store by a previous run.
    ///
    /// The most recently queued task is the one that was most likely in
    /// flight when the process died, so its attempt counter is bumped; when
    /// that exceeds `max_attempts` the task is dropped from the store and
    /// returned in `abandoned` instead of being requeued. Everything else
    /// goes back in its original order, ahead of any new arrivals.
    pub async fn recover(&self, max_attempts: u32) -> QueueResult<RecoveryOutcome> {
        self.tasks.lock().await.clear();
        let mut pending = self.store.load_pending_tasks()?;
        if pending.is_empty() {
            log::info!("task recovery: nothing pending");
            return Ok(RecoveryOutcome::default());
        }

        let latest_index = pending
            .iter()
            .enumerate()
            .max_by_key(|(_, t)| t.queued_at)
            .map(|(i, _)| i)
            .unwrap_or(pending.len() - 1);
        pending[latest_index].attempts += 1;

        let mut outcome = RecoveryOutcome::default();
        // push_front reverses, so feed the tasks back in reverse order to
        // end up oldest-first
        for task in pending.into_iter().rev() {
            if task.attempts > max_attempts {
                log::warn!(
                    "task {} for {} exceeded {} attempts, abandoning",
                    task.id,
                    task.pull_request_url,
                    max_attempts
                );
                self.store.delete_task(task.id)?;
                outcome.abandoned.push(task);
                continue;
            }
            self.store.save_task(&task)?;
            {
                let mut tasks = self.tasks.lock().await;
                tasks.push_front(task);
            }
            self.notify.notify_one();
            outcome.requeued += 1;
        }
        log::info!(
            "task recovery: {} requeued, {} abandoned",
            outcome.requeued,
            outcome.abandoned.len()
        );
        Ok(outcome)
    }
}
