//! Directory-backed JSON store
//!
//! Licenses and conflicts live in `licenses.json` / `conflicts.json`, the
//! pending task list in `tasks.json`, and detection records are appended to
//! `detections.jsonl`. Whole-file rewrite on every mutation keeps the format
//! trivially recoverable; the task list is small by construction.

use crate::catalog::types::{ConflictPair, License};
use crate::queue::types::Task;
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{LicenseStore, ResultStore, TaskStore};
use crate::store::types::DetectionRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const LICENSES_FILE: &str = "licenses.json";
const CONFLICTS_FILE: &str = "conflicts.json";
const TASKS_FILE: &str = "tasks.json";
const DETECTIONS_FILE: &str = "detections.jsonl";

pub struct JsonStore {
    root: PathBuf,
    // One writer at a time; readers of a fully-written file are safe
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open(root: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(root).map_err(|source| StoreError::Io {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_vec<T: DeserializeOwned>(&self, file: &str) -> StoreResult<Vec<T>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_vec<T: Serialize>(&self, file: &str, items: &[T]) -> StoreResult<()> {
        let path = self.root.join(file);
        let data = serde_json::to_string_pretty(items)?;
        std::fs::write(&path, data).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl LicenseStore for JsonStore {
    fn load_licenses(&self) -> StoreResult<Vec<License>> {
        self.read_vec(LICENSES_FILE)
    }

    fn load_conflicts(&self) -> StoreResult<Vec<ConflictPair>> {
        self.read_vec(CONFLICTS_FILE)
    }

    fn save_license(&self, license: &License) -> StoreResult<License> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut licenses: Vec<License> = self.read_vec(LICENSES_FILE)?;
        let next_id = licenses
            .iter()
            .filter_map(|l| l.id)
            .max()
            .unwrap_or(0)
            + 1;
        let mut saved = license.clone();
        saved.id = Some(next_id);
        licenses.push(saved.clone());
        self.write_vec(LICENSES_FILE, &licenses)?;
        Ok(saved)
    }
}

impl TaskStore for JsonStore {
    fn save_task(&self, task: &Task) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut tasks: Vec<Task> = self.read_vec(TASKS_FILE)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write_vec(TASKS_FILE, &tasks)
    }

    fn delete_task(&self, id: u64) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut tasks: Vec<Task> = self.read_vec(TASKS_FILE)?;
        tasks.retain(|t| t.id != id);
        self.write_vec(TASKS_FILE, &tasks)
    }

    fn load_pending_tasks(&self) -> StoreResult<Vec<Task>> {
        self.read_vec(TASKS_FILE)
    }

    fn next_task_id(&self) -> StoreResult<u64> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let tasks: Vec<Task> = self.read_vec(TASKS_FILE)?;
        Ok(tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1)
    }
}

impl ResultStore for JsonStore {
    fn save_detection(&self, record: &DetectionRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = self.root.join(DETECTIONS_FILE);
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}
