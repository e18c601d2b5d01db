//! Narrow persistence contracts consumed by the core
//!
//! The catalog, queue, and pipeline only ever reach storage through these
//! traits; what backs them (local JSON, a database client) is a deployment
//! concern.

use crate::catalog::types::{ConflictPair, License};
use crate::queue::types::Task;
use crate::store::error::StoreResult;
use crate::store::types::DetectionRecord;

/// License catalog backing store
pub trait LicenseStore: Send + Sync {
    fn load_licenses(&self) -> StoreResult<Vec<License>>;
    fn load_conflicts(&self) -> StoreResult<Vec<ConflictPair>>;
    /// Persist a license first seen in scanner output; assigns its id
    fn save_license(&self, license: &License) -> StoreResult<License>;
}

/// Durable task storage behind the queue
pub trait TaskStore: Send + Sync {
    /// Insert or update a task by id
    fn save_task(&self, task: &Task) -> StoreResult<()>;
    fn delete_task(&self, id: u64) -> StoreResult<()>;
    /// All tasks that were pending at the last shutdown, in stored order
    fn load_pending_tasks(&self) -> StoreResult<Vec<Task>>;
    /// Allocate an id for a new task
    fn next_task_id(&self) -> StoreResult<u64>;
}

/// Sink for per-file detection and conflict records
pub trait ResultStore: Send + Sync {
    fn save_detection(&self, record: &DetectionRecord) -> StoreResult<()>;
}
