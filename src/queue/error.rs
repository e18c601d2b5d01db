//! Queue Error Types

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The queue refused the operation because shutdown is in progress
    #[error("Queue is shutting down")]
    ShuttingDown,

    /// The backing task store failed; the queue and its store may disagree
    #[error("Task store failure: {0}")]
    Store(#[from] StoreError),
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
