//! SCANOSS scanner integration
//!
//! Drives the `scanoss-py` CLI over a directory of changed files, parses
//! its JSON report, and resolves every reported license through the
//! catalog. Identifiers the catalog has never seen are registered as
//! unreviewed so they classify consistently on later scans.

use crate::catalog::{ConflictSource, LicenseCatalog, License};
use crate::queue::types::Task;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::types::{ComponentInfo, ScannedFile};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;

/// A detector that turns a directory of changed files into per-file
/// license findings.
#[async_trait]
pub trait LicenseScanner: Send + Sync {
    async fn scan(&self, task: &Task, source_dir: &Path) -> ScanResult<Vec<ScannedFile>>;
}

/// Raw SCANOSS report shapes. The report is a map of scanned path to a
/// list of matches; fields not consumed here are ignored.
#[derive(Debug, Deserialize)]
struct RawMatch {
    id: String,
    #[serde(default)]
    lines: Option<String>,
    #[serde(default)]
    oss_lines: Option<String>,
    #[serde(default)]
    matched: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    licenses: Vec<RawLicense>,
}

#[derive(Debug, Deserialize)]
struct RawLicense {
    name: String,
    #[serde(default)]
    checklist_url: Option<String>,
    #[serde(default)]
    incompatible_with: Vec<String>,
}

pub struct ScanossScanner {
    command: String,
    results_dir: PathBuf,
    catalog: Arc<LicenseCatalog>,
}

impl ScanossScanner {
    pub fn new(command: String, results_dir: PathBuf, catalog: Arc<LicenseCatalog>) -> Self {
        Self {
            command,
            results_dir,
            catalog,
        }
    }

    fn report_path(&self, task: &Task) -> PathBuf {
        let name = task
            .full_name()
            .unwrap_or_else(|| "unknown".to_string())
            .replace('/', "_");
        self.results_dir
            .join(format!("{}_{}.json", name, task.head_commit_sha))
    }

    async fn run_scanner(&self, source_dir: &Path, report: &Path) -> ScanResult<()> {
        log::info!("running {} over {}", self.command, source_dir.display());
        let output = Command::new(&self.command)
            .arg("scan")
            .arg("-t")
            .arg("--ignore-cert-errors")
            .arg("-o")
            .arg(report)
            .arg(source_dir)
            .output()
            .await
            .map_err(ScanError::Launch)?;
        if !output.status.success() {
            return Err(ScanError::ScannerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // scanoss-py reports some failures on stderr with a zero exit
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            if line.contains("ERROR") {
                return Err(ScanError::ScannerFailed {
                    status: output.status.to_string(),
                    stderr: line.trim().to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolve_license(&self, raw: &RawLicense) -> License {
        let mut license = match self.catalog.check_license(&raw.name) {
            Some(license) => license,
            None => self.catalog.register_license(&raw.name, &raw.name),
        };
        if license.checklist_url.is_none() {
            license.checklist_url = raw.checklist_url.clone();
        }
        if self.catalog.conflict_source() == ConflictSource::Scanner {
            for other in &raw.incompatible_with {
                self.catalog.add_conflict(&raw.name, other);
            }
        }
        license
    }

    pub(crate) async fn parse_report(
        &self,
        data: &str,
        source_dir: &Path,
    ) -> ScanResult<Vec<ScannedFile>> {
        let raw: BTreeMap<String, Vec<RawMatch>> = serde_json::from_str(data)?;
        let mut files = Vec::new();
        for (path, matches) in raw {
            for m in matches {
                if m.id == "none" {
                    continue;
                }
                let relative = path.trim_start_matches('/').to_string();
                let absolute_path = source_dir.join(&relative);
                let lines_raw = m
                    .oss_lines
                    .as_deref()
                    .or(m.lines.as_deref())
                    .unwrap_or("");
                let matched_lines = normalize_matched_lines(lines_raw, &absolute_path).await;
                let licenses = m
                    .licenses
                    .iter()
                    .map(|raw| self.resolve_license(raw))
                    .collect();
                files.push(ScannedFile {
                    path: relative,
                    absolute_path,
                    snippet_type: Some(m.id),
                    snippet_match: m.matched,
                    matched_lines,
                    licenses,
                    component: ComponentInfo {
                        name: m.component,
                        file_path: m.file,
                        file_url: m.file_url,
                        lines: m.lines,
                        url: m.url,
                        version: m.version,
                        vendor: m.vendor,
                    },
                });
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl LicenseScanner for ScanossScanner {
    async fn scan(&self, task: &Task, source_dir: &Path) -> ScanResult<Vec<ScannedFile>> {
        tokio::fs::create_dir_all(&self.results_dir)
            .await
            .map_err(|source| ScanError::Io {
                path: self.results_dir.display().to_string(),
                source,
            })?;
        let report = self.report_path(task);
        self.run_scanner(source_dir, &report).await?;
        let data = tokio::fs::read_to_string(&report)
            .await
            .map_err(|source| ScanError::Io {
                path: report.display().to_string(),
                source,
            })?;
        let files = self.parse_report(&data, source_dir).await?;
        log::info!(
            "scan of {} finished: {} file matches",
            task.pull_request_url,
            files.len()
        );
        Ok(files)
    }
}

/// Normalize a scanner line-range string. Byte-offset ranges
/// (`BYTES:start-end` pairs) are converted to line ranges by counting
/// newlines in the scanned file; conversion failures fall back to an
/// empty range rather than failing the scan.
pub(crate) async fn normalize_matched_lines(raw: &str, file: &Path) -> String {
    let raw = raw.trim();
    if let Some(byte_ranges) = raw.strip_prefix("BYTES:") {
        return match tokio::fs::read(file).await {
            Ok(content) => byte_ranges_to_lines(byte_ranges, &content),
            Err(_) => String::new(),
        };
    }
    raw.to_string()
}

fn byte_ranges_to_lines(ranges: &str, content: &[u8]) -> String {
    let line_at = |offset: usize| -> usize {
        let end = offset.min(content.len());
        content[..end].iter().filter(|b| **b == b'\n').count() + 1
    };
    let mut out = Vec::new();
    for range in ranges.split(',') {
        let range = range.trim();
        let Some((start, end)) = range.split_once('-') else {
            continue;
        };
        let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
        else {
            continue;
        };
        out.push(format!("{}-{}", line_at(start), line_at(end)));
    }
    out.join(",")
}
