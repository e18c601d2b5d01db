//! Application startup and wiring
//!
//! Parses the CLI, loads configuration, starts logging and the tokio
//! runtime, then runs either the queue-processing service or a one-shot
//! `--rescan` of a single pull request.

use crate::app::cli::Cli;
use crate::app::config::Config;
use crate::app::error::AppError;
use crate::catalog::LicenseCatalog;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::pipeline::{QueueProcessor, ScanPipeline, TaskVerdict};
use crate::queue::types::{Task, TaskAction};
use crate::scm::traits::SourceControlClient;
use crate::queue::TaskQueue;
use crate::scanner::ScanossScanner;
use crate::scm::GithubClient;
use crate::store::JsonStore;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;

pub fn startup() -> i32 {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.log.level.clone());
    let log_format = cli
        .log_format
        .clone()
        .or_else(|| config.log.format.clone());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.log.file.clone())
        .map(|p| p.display().to_string());
    if let Err(e) = init_logging(
        log_level.as_deref(),
        log_format.as_deref(),
        log_file.as_deref(),
        !cli.no_color,
    ) {
        eprintln!("Error initializing logging: {e}");
        return 1;
    }

    log::info!(
        "lichen {} ({}, built {}) starting",
        env!("CARGO_PKG_VERSION"),
        crate::GIT_HASH,
        crate::BUILD_TIME
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("failed to start async runtime: {e}");
            return 1;
        }
    };

    let result: Result<i32, AppError> = runtime.block_on(
        ShutdownCoordinator::guard_with_coordinator(|coordinator, _shutdown_rx| async move {
            run(cli, config, coordinator).await
        }),
    );

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("fatal: {e}");
            1
        }
    }
}

async fn run(cli: Cli, config: Config, coordinator: ShutdownCoordinator) -> Result<i32, AppError> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let store = Arc::new(JsonStore::open(&data_dir)?);
    log::info!("data directory: {}", store.root().display());

    let catalog = Arc::new(LicenseCatalog::new(store.clone(), config.conflict_source()));
    catalog.load();

    let scm = Arc::new(GithubClient::new(
        config.github_api_url(),
        config.github.token.clone(),
    )?);
    let scanner = Arc::new(ScanossScanner::new(
        config.scanner_command(),
        config.results_dir(),
        catalog.clone(),
    ));
    let queue = Arc::new(TaskQueue::new(store.clone(), &coordinator));
    let pipeline = Arc::new(ScanPipeline::new(
        scm.clone(),
        scanner,
        catalog,
        store.clone(),
        config.work_dir(),
    ));

    if let Some(pr_api_url) = &cli.rescan {
        let Some(commit) = &cli.commit else {
            log::error!("--rescan requires --commit <SHA>");
            return Ok(2);
        };
        return rescan_once(&queue, &pipeline, &scm, pr_api_url, commit).await;
    }

    let processor = QueueProcessor::new(queue, pipeline, scm, config.max_attempts());
    processor.recover().await?;
    processor.run().await?;
    log::info!("lichen stopped");
    Ok(0)
}

/// One-shot mode: scan a single pull request and exit
async fn rescan_once(
    queue: &TaskQueue,
    pipeline: &ScanPipeline,
    scm: &Arc<GithubClient>,
    pr_api_url: &str,
    commit: &str,
) -> Result<i32, AppError> {
    let mut task = rescan_task(queue.next_task_id()?, pr_api_url, commit);
    queue.push_back(task.clone()).await?;
    let code = match pipeline.process(&mut task).await {
        Ok(verdict) => {
            log::info!("rescan of {} finished: {verdict}", task.pull_request_url);
            match verdict {
                TaskVerdict::IssuesDetected => 3,
                TaskVerdict::Clean | TaskVerdict::NoFilesFound => 0,
            }
        }
        Err(e) => {
            log::error!("rescan of {} failed: {e}", task.pull_request_url);
            if let Err(status_err) = scm.set_failure_status(&task).await {
                log::error!("failed to set failure status: {status_err}");
            }
            1
        }
    };
    queue.delete(&task)?;
    Ok(code)
}

/// Build a task from a pull-request REST API URL, e.g.
/// `https://api.github.com/repos/org/name/pulls/42`.
pub(crate) fn rescan_task(id: u64, pr_api_url: &str, commit: &str) -> Task {
    let repo_api = pr_api_url
        .split("/pulls/")
        .next()
        .unwrap_or(pr_api_url)
        .to_string();
    let repository_url = repo_api.replace("api.github.com/repos", "github.com");
    let pull_request_url = pr_api_url
        .replace("api.github.com/repos", "github.com")
        .replace("/pulls/", "/pull/");
    Task {
        id,
        action: TaskAction::Rescan,
        attempts: 0,
        queued_at: Utc::now(),
        user_id: Some("cli".to_string()),
        repository_url,
        pull_request_url,
        pull_request_api_url: pr_api_url.to_string(),
        pull_request_files_url: format!("{}/files", pr_api_url.trim_end_matches('/')),
        head_commit_sha: commit.to_string(),
        repository_license: None,
    }
}
