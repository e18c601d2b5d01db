//! GitHub client
//!
//! Talks to the REST API with an injected token: changed-file download via
//! the pull-request files endpoint (file content reconstructed from the
//! unified-diff patch), repository license lookup, commit statuses, and the
//! scan report comment.

use crate::queue::types::Task;
use crate::scm::error::{ScmError, ScmResult};
use crate::scm::report::ScanReport;
use crate::scm::traits::SourceControlClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const STATUS_CONTEXT: &str = "license-scan";
const USER_AGENT: &str = concat!("lichen/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
struct LicenseInfo {
    spdx_id: Option<String>,
}

impl GithubClient {
    pub fn new(api_base: String, token: Option<String>) -> ScmResult<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> ScmResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(ScmError::Api { status, message })
    }

    fn coordinates(task: &Task) -> ScmResult<(String, String)> {
        let full_name = task
            .full_name()
            .ok_or_else(|| ScmError::MalformedTask(task.repository_url.clone()))?;
        let number = task
            .pull_request_number()
            .ok_or_else(|| ScmError::MalformedTask(task.pull_request_url.clone()))?;
        Ok((full_name, number.to_string()))
    }

    async fn set_status(&self, task: &Task, state: &str, description: &str) -> ScmResult<()> {
        let (full_name, _) = Self::coordinates(task)?;
        let url = format!(
            "{}/repos/{}/statuses/{}",
            self.api_base, full_name, task.head_commit_sha
        );
        let body = json!({
            "state": state,
            "description": description,
            "context": STATUS_CONTEXT,
        });
        let response = self.authorized(self.http.post(&url)).json(&body).send().await?;
        Self::check(response).await?;
        log::debug!("commit status for {} set to {}", task.head_commit_sha, state);
        Ok(())
    }
}

#[async_trait]
impl SourceControlClient for GithubClient {
    async fn fetch_changed_files(&self, task: &Task, target_dir: &Path) -> ScmResult<usize> {
        let mut written = 0usize;
        let mut page = 1u32;
        loop {
            let page_param = page.to_string();
            let response = self
                .authorized(self.http.get(&task.pull_request_files_url))
                .query(&[("per_page", "100"), ("page", page_param.as_str())])
                .send()
                .await?;
            let files: Vec<ChangedFile> = Self::check(response).await?.json().await?;
            let page_len = files.len();
            for file in files {
                if file.status.as_deref() == Some("removed") {
                    continue;
                }
                // binary files carry no patch and cannot be reconstructed
                let Some(patch) = file.patch else {
                    log::debug!("skipping {} (no textual patch)", file.filename);
                    continue;
                };
                let Some(path) = scratch_path(target_dir, &file.filename) else {
                    log::warn!("skipping {} (unsafe path)", file.filename);
                    continue;
                };
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| ScmError::Io {
                            path: parent.display().to_string(),
                            source,
                        })?;
                }
                tokio::fs::write(&path, patch_to_content(&patch))
                    .await
                    .map_err(|source| ScmError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                written += 1;
            }
            if page_len < 100 {
                break;
            }
            page += 1;
        }
        log::info!(
            "downloaded {} changed files for {}",
            written,
            task.pull_request_url
        );
        Ok(written)
    }

    async fn repository_license(&self, task: &Task) -> ScmResult<Option<String>> {
        let (full_name, _) = Self::coordinates(task)?;
        let url = format!("{}/repos/{}/license", self.api_base, full_name);
        let response = self.authorized(self.http.get(&url)).send().await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let parsed: LicenseResponse = Self::check(response).await?.json().await?;
        Ok(parsed
            .license
            .and_then(|l| l.spdx_id)
            .filter(|id| !id.is_empty() && id != "NOASSERTION"))
    }

    async fn set_pending_status(&self, task: &Task) -> ScmResult<()> {
        self.set_status(task, "pending", "License scan in progress")
            .await
    }

    async fn set_failure_status(&self, task: &Task) -> ScmResult<()> {
        self.set_status(task, "error", "License scan failed").await
    }

    async fn post_report(&self, task: &Task, report: &ScanReport) -> ScmResult<()> {
        if report.is_empty() {
            let (state, description) = report_status(report);
            return self.set_status(task, state, description).await;
        }
        let (full_name, number) = Self::coordinates(task)?;
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, full_name, number
        );
        let body = json!({ "body": report.to_markdown(task) });
        let response = self.authorized(self.http.post(&url)).json(&body).send().await?;
        Self::check(response).await?;

        let (state, description) = report_status(report);
        self.set_status(task, state, description).await
    }
}

/// Commit status for a finished scan. A pull request with nothing to
/// scan gets its own success description so the reporting surface can
/// tell it apart from a scanned-and-clean one.
pub(crate) fn report_status(report: &ScanReport) -> (&'static str, &'static str) {
    if report.no_files {
        ("success", "Files are not found")
    } else if report.has_issue() {
        ("failure", "License issues detected")
    } else {
        ("success", "No license issues detected")
    }
}

/// Join an API-supplied filename under the scratch directory. Absolute
/// paths and anything with `..` or `.` components must not escape it.
pub(crate) fn scratch_path(target_dir: &Path, filename: &str) -> Option<std::path::PathBuf> {
    let relative = Path::new(filename);
    let mut components = relative.components().peekable();
    components.peek()?;
    if components.all(|c| matches!(c, std::path::Component::Normal(_))) {
        Some(target_dir.join(relative))
    } else {
        None
    }
}

/// Rebuild file content from a unified-diff patch: hunk headers pad the
/// output so added lines land near their real line numbers, removed lines
/// are dropped, and the leading diff marker is stripped from the rest.
pub(crate) fn patch_to_content(patch: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(start) = hunk_new_start(line) {
                while lines.len() + 1 < start {
                    lines.push(String::new());
                }
            }
        } else if let Some(added) = line.strip_prefix('+') {
            lines.push(added.to_string());
        } else if line.starts_with('-') {
            // removed by the pull request, not part of the new content
        } else {
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        }
    }
    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Parse the new-file start line out of `@@ -a,b +c,d @@`
fn hunk_new_start(header: &str) -> Option<usize> {
    let plus = header
        .split_whitespace()
        .find(|token| token.starts_with('+'))?;
    plus[1..].split(',').next()?.parse().ok()
}
