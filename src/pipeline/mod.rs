//! Scan pipeline: per-task processing and the sequential queue processor.

pub mod error;
pub mod pipeline;
pub mod processor;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{ScanPipeline, TaskVerdict};
pub use processor::QueueProcessor;

#[cfg(test)]
mod tests;
