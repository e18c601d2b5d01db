//! Single-task scan pipeline
//!
//! One `process` call takes a task through the whole scan: pending status,
//! changed-file download, repository license resolution, scanner run,
//! conflict matching, detection persistence, and the final report.

use crate::catalog::LicenseCatalog;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::queue::types::Task;
use crate::scanner::LicenseScanner;
use crate::scm::report::ScanReport;
use crate::scm::SourceControlClient;
use crate::store::types::DetectionRecord;
use crate::store::ResultStore;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use strum_macros::Display;

/// Outcome of a completed (non-erroring) scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TaskVerdict {
    /// Files were scanned and nothing blocks the pull request
    Clean,
    /// At least one flagged license or conflict was found
    IssuesDetected,
    /// The pull request had no scannable files
    NoFilesFound,
}

pub struct ScanPipeline {
    scm: Arc<dyn SourceControlClient>,
    scanner: Arc<dyn LicenseScanner>,
    catalog: Arc<LicenseCatalog>,
    results: Arc<dyn ResultStore>,
    work_dir: PathBuf,
}

impl ScanPipeline {
    pub fn new(
        scm: Arc<dyn SourceControlClient>,
        scanner: Arc<dyn LicenseScanner>,
        catalog: Arc<LicenseCatalog>,
        results: Arc<dyn ResultStore>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            scm,
            scanner,
            catalog,
            results,
            work_dir,
        }
    }

    /// Per-task scratch directory for the downloaded files
    fn task_dir(&self, task: &Task) -> PathBuf {
        let repo = task
            .full_name()
            .unwrap_or_else(|| "unknown".to_string())
            .replace('/', "_");
        let number = task.pull_request_number().unwrap_or("pr");
        self.work_dir
            .join(repo)
            .join(format!("{}_{}", number, task.head_commit_sha))
    }

    pub async fn process(&self, task: &mut Task) -> PipelineResult<TaskVerdict> {
        // best-effort; a missed pending marker must not abort the scan
        if let Err(e) = self.scm.set_pending_status(task).await {
            log::warn!(
                "failed to set pending status for {}: {e}",
                task.pull_request_url
            );
        }

        let task_dir = self.task_dir(task);
        // leftovers from an interrupted earlier run must not pollute the scan
        if task_dir.exists() {
            let _ = tokio::fs::remove_dir_all(&task_dir).await;
        }
        tokio::fs::create_dir_all(&task_dir)
            .await
            .map_err(|source| PipelineError::Io {
                path: task_dir.display().to_string(),
                source,
            })?;

        let fetched = self.scm.fetch_changed_files(task, &task_dir).await?;
        if fetched == 0 {
            log::info!("no scannable files in {}", task.pull_request_url);
            self.scm.post_report(task, &ScanReport::without_files()).await?;
            self.cleanup(&task_dir).await;
            return Ok(TaskVerdict::NoFilesFound);
        }

        let repository_license = self.resolve_repository_license(task).await;
        task.repository_license = repository_license.clone();

        let files = self.scanner.scan(task, &task_dir).await?;
        let conflicts = self
            .catalog
            .find_conflicts(repository_license.as_deref(), &files);
        let report = ScanReport {
            files,
            conflicts,
            repository_license,
            no_files: false,
        };

        self.record_detections(task, &report);
        self.scm.post_report(task, &report).await?;
        self.cleanup(&task_dir).await;

        if report.has_issue() {
            Ok(TaskVerdict::IssuesDetected)
        } else {
            Ok(TaskVerdict::Clean)
        }
    }

    /// Resolve the repository's declared license to a catalog SPDX
    /// identifier. A platform value the catalog cannot resolve, or a
    /// failed platform call, degrades to absent rather than an error.
    async fn resolve_repository_license(&self, task: &Task) -> Option<String> {
        let raw = match self.scm.repository_license(task).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!(
                    "failed to resolve repository license for {}: {e}",
                    task.pull_request_url
                );
                return None;
            }
        };
        let resolved = self
            .catalog
            .check_license(&raw)
            .or_else(|| self.catalog.find_by_name(&raw))
            .map(|l| l.spdx_id);
        if resolved.is_none() {
            log::debug!("repository license {raw} not found in the catalog");
        }
        resolved
    }

    /// Persist one record per detected license and one per conflict.
    /// Storage failures are logged; a lost record must not block the
    /// report already assembled for the pull request.
    fn record_detections(&self, task: &Task, report: &ScanReport) {
        let repo_license = report.repository_license.clone();
        for file in &report.files {
            for license in &file.licenses {
                let record = DetectionRecord {
                    task_id: task.id,
                    pull_request_url: task.pull_request_url.clone(),
                    recorded_at: Utc::now(),
                    has_issue: license.access.flags_issue(),
                    file_path: Some(file.path.clone()),
                    license_spdx_id: Some(license.spdx_id.clone()),
                    access: Some(license.access.to_string()),
                    snippet_type: file.snippet_type.clone(),
                    snippet_match: file.snippet_match.clone(),
                    matched_lines: non_empty(&file.matched_lines),
                    component_name: file.component.name.clone(),
                    component_file_path: file.component.file_path.clone(),
                    component_file_url: file.component.file_url.clone(),
                    component_lines: file.component.lines.clone(),
                    component_url: file.component.url.clone(),
                    component_version: file.component.version.clone(),
                    component_vendor: file.component.vendor.clone(),
                    repository_license: repo_license.clone(),
                    conflict: None,
                };
                if let Err(e) = self.results.save_detection(&record) {
                    log::error!("failed to record detection for {}: {e}", file.path);
                }
            }
        }
        for conflict in &report.conflicts {
            let record = DetectionRecord {
                task_id: task.id,
                pull_request_url: task.pull_request_url.clone(),
                recorded_at: Utc::now(),
                has_issue: true,
                file_path: None,
                license_spdx_id: None,
                access: None,
                snippet_type: None,
                snippet_match: None,
                matched_lines: None,
                component_name: None,
                component_file_path: None,
                component_file_url: None,
                component_lines: None,
                component_url: None,
                component_version: None,
                component_vendor: None,
                repository_license: repo_license.clone(),
                conflict: Some(conflict.clone()),
            };
            if let Err(e) = self.results.save_detection(&record) {
                log::error!("failed to record conflict {conflict}: {e}");
            }
        }
    }

    async fn cleanup(&self, task_dir: &std::path::Path) {
        if let Err(e) = tokio::fs::remove_dir_all(task_dir).await {
            log::warn!("failed to clean up {}: {e}", task_dir.display());
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
