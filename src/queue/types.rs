//! Task types for the scan queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of pull-request event produced a task
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Open,
    Update,
    Close,
    Rescan,
}

/// One unit of queued work: a single pull-request scan request.
///
/// The URL fields are opaque to the core and passed through verbatim to the
/// source-control client; only the repository organization/name and the
/// pull-request number are ever derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier, also the identity used by queue removal
    pub id: u64,
    pub action: TaskAction,
    /// Processing attempts so far; bumped during crash recovery
    pub attempts: u32,
    pub queued_at: DateTime<Utc>,
    /// Reviewer or ingress user that requested the scan
    pub user_id: Option<String>,
    pub repository_url: String,
    pub pull_request_url: String,
    pub pull_request_api_url: String,
    pub pull_request_files_url: String,
    pub head_commit_sha: String,
    /// Resolved during processing; absent until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_license: Option<String>,
}

impl Task {
    /// Repository organization, parsed from the repository URL
    pub fn organization(&self) -> Option<&str> {
        let mut segments = self.repository_url.trim_end_matches('/').rsplit('/');
        segments.next()?;
        segments.next().filter(|s| !s.is_empty())
    }

    /// Repository name, parsed from the repository URL
    pub fn repository_name(&self) -> Option<&str> {
        self.repository_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }

    /// "org/name", when both parse
    pub fn full_name(&self) -> Option<String> {
        Some(format!("{}/{}", self.organization()?, self.repository_name()?))
    }

    /// Pull-request number, the trailing segment of the pull-request URL
    pub fn pull_request_number(&self) -> Option<&str> {
        self.pull_request_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

// Queue removal is by identity, which for tasks is the store-assigned id;
// attempt bumps and license resolution must not break matching.
impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}
