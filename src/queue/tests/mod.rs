
use crate::queue::types::{Task, TaskAction};
use crate::store::{StoreResult, TaskStore};
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// In-memory task store for queue tests
pub(crate) struct MemoryTaskStore {
    pub tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tasks.lock().unwrap().iter().map(|t| t.id).collect()
    }
}

impl TaskStore for MemoryTaskStore {
    fn save_task(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        Ok(())
    }

    fn delete_task(&self, id: u64) -> StoreResult<()> {
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    fn load_pending_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().clone())
    }

    fn next_task_id(&self) -> StoreResult<u64> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1)
    }
}

pub(crate) fn task_at(id: u64, queued_at: DateTime<Utc>) -> Task {
    Task {
        id,
        action: TaskAction::Open,
        attempts: 0,
        queued_at,
        user_id: None,
        repository_url: "https://github.com/acme/widget".to_string(),
        pull_request_url: format!("https://github.com/acme/widget/pull/{id}"),
        pull_request_api_url: format!("https://api.github.com/repos/acme/widget/pulls/{id}"),
        pull_request_files_url: format!(
            "https://api.github.com/repos/acme/widget/pulls/{id}/files"
        ),
        head_commit_sha: "0123abcd".to_string(),
        repository_license: None,
    }
}

pub(crate) fn task(id: u64) -> Task {
    task_at(id, Utc::now())
}
