//! Scanner Error Types

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to launch scanner process: {0}")]
    Launch(#[source] std::io::Error),

    #[error("Scanner exited with {status}: {stderr}")]
    ScannerFailed { status: String, stderr: String },

    #[error("Failed to parse scanner output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
