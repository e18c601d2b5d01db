//! Source Control Error Types

#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API call failed with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The task's URLs do not parse into repository coordinates
    #[error("Malformed task: {0}")]
    MalformedTask(String),
}

/// Result type for source-control operations
pub type ScmResult<T> = Result<T, ScmError>;
