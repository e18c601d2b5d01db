
use crate::catalog::tests::{license, MemoryLicenseStore};
use crate::catalog::types::{ConflictPair, License, LicenseAccess};
use crate::catalog::{ConflictSource, LicenseCatalog};
use crate::queue::types::Task;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::types::{ComponentInfo, ScannedFile};
use crate::scanner::LicenseScanner;
use crate::scm::error::ScmResult;
use crate::scm::report::ScanReport;
use crate::scm::SourceControlClient;
use crate::store::types::DetectionRecord;
use crate::store::{ResultStore, StoreResult};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted source-control client that records every call
pub(crate) struct MockScm {
    pub events: Mutex<Vec<String>>,
    pub repository_license: Option<String>,
    pub changed_files: usize,
}

impl MockScm {
    pub fn new(repository_license: Option<&str>, changed_files: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            repository_license: repository_license.map(str::to_string),
            changed_files,
        }
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceControlClient for MockScm {
    async fn fetch_changed_files(&self, _task: &Task, _target_dir: &Path) -> ScmResult<usize> {
        self.record(format!("fetch:{}", self.changed_files));
        Ok(self.changed_files)
    }

    async fn repository_license(&self, _task: &Task) -> ScmResult<Option<String>> {
        self.record("license".to_string());
        Ok(self.repository_license.clone())
    }

    async fn set_pending_status(&self, _task: &Task) -> ScmResult<()> {
        self.record("status:pending".to_string());
        Ok(())
    }

    async fn set_failure_status(&self, task: &Task) -> ScmResult<()> {
        self.record(format!("status:error:{}", task.id));
        Ok(())
    }

    async fn post_report(&self, _task: &Task, report: &ScanReport) -> ScmResult<()> {
        let mut event = format!(
            "report:files={},conflicts={},issue={}",
            report.files.len(),
            report.conflicts.len(),
            report.has_issue()
        );
        if report.no_files {
            event.push_str(",no-files");
        }
        self.record(event);
        Ok(())
    }
}

/// Scripted scanner that tracks how many scans run at once
pub(crate) struct MockScanner {
    pub findings: Mutex<Vec<Vec<ScannedFile>>>,
    pub fail: bool,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub scans: AtomicUsize,
}

impl MockScanner {
    pub fn returning(findings: Vec<ScannedFile>) -> Self {
        Self {
            findings: Mutex::new(vec![findings]),
            fail: false,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mut scanner = Self::returning(Vec::new());
        scanner.fail = true;
        scanner
    }
}

#[async_trait]
impl LicenseScanner for MockScanner {
    async fn scan(&self, _task: &Task, _source_dir: &Path) -> ScanResult<Vec<ScannedFile>> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.scans.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScanError::ScannerFailed {
                status: "exit status: 1".to_string(),
                stderr: "scanner blew up".to_string(),
            });
        }
        let mut findings = self.findings.lock().unwrap();
        if findings.len() > 1 {
            Ok(findings.remove(0))
        } else {
            Ok(findings.first().cloned().unwrap_or_default())
        }
    }
}

/// Detection sink collecting records in memory
#[derive(Default)]
pub(crate) struct MemoryResultStore {
    pub records: Mutex<Vec<DetectionRecord>>,
}

impl ResultStore for MemoryResultStore {
    fn save_detection(&self, record: &DetectionRecord) -> StoreResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub(crate) fn scanned(path: &str, licenses: Vec<License>) -> ScannedFile {
    ScannedFile {
        path: path.to_string(),
        absolute_path: format!("/work/{path}").into(),
        snippet_type: Some("file".to_string()),
        snippet_match: Some("100%".to_string()),
        matched_lines: "all".to_string(),
        licenses,
        component: ComponentInfo::default(),
    }
}

/// Catalog seeded with the licenses and conflicts the scenarios need
pub(crate) fn seeded_catalog() -> Arc<LicenseCatalog> {
    let store = MemoryLicenseStore::new(
        vec![
            license("MIT", "MIT License", LicenseAccess::Permitted),
            license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted),
            license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited),
            license("Proprietary", "Proprietary License", LicenseAccess::Prohibited),
        ],
        vec![
            ConflictPair::new("GPL-3.0-only", "Apache-2.0"),
            ConflictPair::new("GPL-3.0-only", "Proprietary"),
        ],
    );
    let catalog = Arc::new(LicenseCatalog::new(Arc::new(store), ConflictSource::Store));
    catalog.load();
    catalog
}

pub(crate) fn mit() -> License {
    license("MIT", "MIT License", LicenseAccess::Permitted)
}

pub(crate) fn gpl() -> License {
    license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)
}

pub(crate) use crate::queue::tests::task as sample_task;
