//! Source-control client contract
//!
//! The pipeline talks to the hosting platform only through this trait, so
//! tests (and any future platform beyond GitHub) plug in behind it.

use crate::queue::types::Task;
use crate::scm::error::ScmResult;
use crate::scm::report::ScanReport;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait SourceControlClient: Send + Sync {
    /// Download the pull request's changed files into `target_dir`,
    /// reconstructed at their in-repository paths. Returns the number of
    /// files written; zero means there is nothing to scan.
    async fn fetch_changed_files(&self, task: &Task, target_dir: &Path) -> ScmResult<usize>;

    /// The repository's declared license as an SPDX identifier, when the
    /// platform knows one.
    async fn repository_license(&self, task: &Task) -> ScmResult<Option<String>>;

    /// Mark the head commit as scan-in-progress.
    async fn set_pending_status(&self, task: &Task) -> ScmResult<()>;

    /// Mark the head commit as failed because the scan itself errored.
    async fn set_failure_status(&self, task: &Task) -> ScmResult<()>;

    /// Post the scan report as a pull-request comment and set the final
    /// commit status from its verdict.
    async fn post_report(&self, task: &Task, report: &ScanReport) -> ScmResult<()>;
}
