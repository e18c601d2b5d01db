//! Scanner result types

use crate::catalog::types::License;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Component (upstream origin) metadata attached to a scanner match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: Option<String>,
    pub file_path: Option<String>,
    pub file_url: Option<String>,
    pub lines: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub vendor: Option<String>,
}

/// One changed file with the scanner's findings for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Path relative to the repository root
    pub path: String,
    /// Where the file content was written locally for scanning
    pub absolute_path: PathBuf,
    /// Match kind reported by the scanner ("file", "snippet", ...)
    pub snippet_type: Option<String>,
    /// Match percentage as reported, e.g. "95%"
    pub snippet_match: Option<String>,
    /// Line ranges of the match: "all", "12-30,45-60", or empty when the
    /// scanner had no usable range data
    pub matched_lines: String,
    /// Candidate licenses, resolved through the catalog
    pub licenses: Vec<License>,
    pub component: ComponentInfo,
}

impl ScannedFile {
    /// Render the license list for a report: Markdown links to the
    /// checklist document where known, with the lowercase access tag.
    /// Scanner-internal `LicenseRef-` identifiers are rewritten to a
    /// scanner-independent display form.
    pub fn licenses_markdown(&self) -> String {
        let mut parts = Vec::with_capacity(self.licenses.len());
        for license in &self.licenses {
            let mut spdx_id = license.spdx_id.clone();
            if spdx_id.starts_with("LicenseRef") {
                spdx_id = format!(
                    "UNREVIEWED LICENSE : {}",
                    spdx_id
                        .replace("LicenseRef-scancode-", "")
                        .replace("LicenseRef-scanoss-", "")
                );
            }
            let access = license.access.to_string().to_lowercase();
            let rendered = match &license.checklist_url {
                Some(url) => format!("[{}]({}) ({})", spdx_id, url, access),
                None => format!("{} ({})", spdx_id, access),
            };
            parts.push(rendered);
        }
        parts.join(", ")
    }
}
