//! Source-control integration: the client trait, the GitHub
//! implementation, and scan report rendering.

pub mod error;
pub mod github;
pub mod report;
pub mod traits;

pub use error::{ScmError, ScmResult};
pub use github::GithubClient;
pub use report::ScanReport;
pub use traits::SourceControlClient;

#[cfg(test)]
mod tests;
