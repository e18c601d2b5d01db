//! Scan report assembly and Markdown rendering

use crate::catalog::types::ConflictPair;
use crate::queue::types::Task;
use crate::scanner::types::ScannedFile;

/// Everything the pipeline found for one pull request
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files: Vec<ScannedFile>,
    pub conflicts: Vec<ConflictPair>,
    pub repository_license: Option<String>,
    /// The pull request had nothing to scan. Keeps the terminal
    /// "files are not found" report apart from a scanned-but-clean one.
    pub no_files: bool,
}

impl ScanReport {
    /// Terminal report for a pull request with no scannable files.
    pub fn without_files() -> Self {
        Self {
            no_files: true,
            ..Self::default()
        }
    }

    /// Whether anything in the report blocks the pull request: a detected
    /// license whose classification flags an issue, or any conflict.
    pub fn has_issue(&self) -> bool {
        if !self.conflicts.is_empty() {
            return true;
        }
        self.files
            .iter()
            .flat_map(|f| f.licenses.iter())
            .any(|l| l.access.flags_issue())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.conflicts.is_empty()
    }

    /// Render the pull-request comment body.
    pub fn to_markdown(&self, task: &Task) -> String {
        let mut body = String::new();
        if !self.files.is_empty() {
            body.push_str("**Detected licenses:**\n\n");
            for file in &self.files {
                body.push_str(&format!("**File:** {}\n", file.path));
                body.push_str(&format!("**License(s):** {}\n", file.licenses_markdown()));
                body.push_str(&format!(
                    "**Component:** {} ({})\n",
                    file.component.name.as_deref().unwrap_or("-"),
                    file.component.file_path.as_deref().unwrap_or("-")
                ));
                body.push_str(&format!(
                    "**Matched lines:** {}\n",
                    matched_lines_links(task, file)
                ));
                body.push_str(&format!(
                    "**Snippet match:** {}\n\n",
                    file.snippet_match.as_deref().unwrap_or("-")
                ));
            }
        }
        if !self.conflicts.is_empty() {
            body.push_str("**Detected license conflicts:**\n\n<ul>");
            for conflict in &self.conflicts {
                body.push_str(&format!("<li>{conflict}</li>"));
            }
            body.push_str("</ul>\n");
            if let Some(repo_license) = &self.repository_license {
                body.push_str(&format!("\nRepository license: {repo_license}\n"));
            }
        }
        body
    }
}

/// Render a file's matched lines as links into the head commit. "all"
/// links the whole file; explicit ranges get one `#L..L..` link each; an
/// empty range renders as a dash.
fn matched_lines_links(task: &Task, file: &ScannedFile) -> String {
    let Some(full_name) = task.full_name() else {
        return file.matched_lines.clone();
    };
    let blob = format!(
        "https://github.com/{}/blob/{}/{}",
        full_name, task.head_commit_sha, file.path
    );
    if file.matched_lines.is_empty() {
        return "-".to_string();
    }
    if file.matched_lines == "all" {
        return format!("[all]({blob})");
    }
    let mut links = Vec::new();
    for range in file.matched_lines.split(',') {
        match range.split_once('-') {
            Some((start, end)) => {
                links.push(format!("[{range}]({blob}#L{start}L{end})"));
            }
            None => links.push(range.to_string()),
        }
    }
    links.join("  ")
}
