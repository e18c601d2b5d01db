//! Pipeline Error Types

use crate::scanner::ScanError;
use crate::scm::ScmError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source control failure: {0}")]
    Scm(#[from] ScmError),

    #[error("Scanner failure: {0}")]
    Scan(#[from] ScanError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
