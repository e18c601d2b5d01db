//! Persisted record types

use crate::catalog::types::ConflictPair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detected-license or detected-conflict record for a processed task.
///
/// License detections carry the file/license/component fields; conflict
/// records carry the `conflict` pair and always flag an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub task_id: u64,
    pub pull_request_url: String,
    pub recorded_at: DateTime<Utc>,
    pub has_issue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_spdx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_lines: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_lines: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictPair>,
}
