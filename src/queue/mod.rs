//! Scan task queue: durable FIFO with front-insertion for recovered work
//! and shutdown-aware blocking dequeue.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{QueueError, QueueResult};
pub use manager::{RecoveryOutcome, TaskQueue};
pub use types::{Task, TaskAction};

#[cfg(test)]
pub(crate) mod tests;
