//! Application Error Types

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Queue(#[from] crate::queue::QueueError),

    #[error(transparent)]
    Scm(#[from] crate::scm::ScmError),

    #[error(transparent)]
    Pipeline(#[from] crate::pipeline::PipelineError),
}
