//! Queue processor loop
//!
//! Pulls tasks off the queue one at a time and runs each through the scan
//! pipeline. Pipeline errors mark the commit as failed but never kill the
//! loop; the loop ends when the queue reports shutdown.

use crate::pipeline::pipeline::ScanPipeline;
use crate::queue::error::QueueError;
use crate::queue::manager::TaskQueue;
use crate::queue::types::Task;
use crate::scm::SourceControlClient;
use std::sync::Arc;

pub struct QueueProcessor {
    queue: Arc<TaskQueue>,
    pipeline: Arc<ScanPipeline>,
    scm: Arc<dyn SourceControlClient>,
    max_attempts: u32,
}

impl QueueProcessor {
    pub fn new(
        queue: Arc<TaskQueue>,
        pipeline: Arc<ScanPipeline>,
        scm: Arc<dyn SourceControlClient>,
        max_attempts: u32,
    ) -> Self {
        Self {
            queue,
            pipeline,
            scm,
            max_attempts,
        }
    }

    /// Replay tasks persisted by a previous run and report the ones that
    /// exhausted their attempts as failed.
    pub async fn recover(&self) -> Result<(), QueueError> {
        let outcome = self.queue.recover(self.max_attempts).await?;
        for task in &outcome.abandoned {
            if let Err(e) = self.scm.set_failure_status(task).await {
                log::error!(
                    "failed to report abandoned task {} ({}): {e}",
                    task.id,
                    task.pull_request_url
                );
            }
        }
        Ok(())
    }

    /// Process tasks until shutdown. Tasks are strictly sequential; a new
    /// one is only taken once the previous scan has fully finished. An
    /// unrecoverable queue error ends the loop and is handed to the caller
    /// so the process can exit non-zero.
    pub async fn run(&self) -> Result<(), QueueError> {
        log::info!("queue processor started");
        loop {
            let mut task = match self.queue.take_front().await {
                Ok(task) => task,
                Err(QueueError::ShuttingDown) => {
                    log::info!("queue processor stopping: shutdown requested");
                    return Ok(());
                }
                Err(e) => {
                    log::error!("queue processor stopping: {e}");
                    return Err(e);
                }
            };
            self.process_one(&mut task).await;
        }
    }

    async fn process_one(&self, task: &mut Task) {
        log::info!(
            "processing task {}: {} ({})",
            task.id,
            task.pull_request_url,
            task.action
        );
        match self.pipeline.process(task).await {
            Ok(verdict) => {
                log::info!("task {} finished: {verdict}", task.id);
            }
            Err(e) => {
                log::error!("task {} failed: {e}", task.id);
                if let Err(status_err) = self.scm.set_failure_status(task).await {
                    log::error!(
                        "failed to set failure status for {}: {status_err}",
                        task.pull_request_url
                    );
                }
            }
        }
        // the store copy served crash recovery; processing is over either way
        if let Err(e) = self.queue.delete(task) {
            log::error!("failed to delete finished task {}: {e}", task.id);
        }
    }
}
