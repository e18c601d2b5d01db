//! TOML configuration file parsing and loading
//!
//! Values resolve in order: CLI flag, config file, environment variable,
//! built-in default. The GitHub token is never read from the CLI; use the
//! config file or `LICHEN_GITHUB_TOKEN`.

use crate::catalog::ConflictSource;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const TOKEN_ENV_VAR: &str = "LICHEN_GITHUB_TOKEN";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory for all persistent state
    pub data_dir: Option<PathBuf>,
    /// Scanner CLI to invoke
    pub scanner_command: Option<String>,
    /// Attempt bound applied during crash recovery
    pub max_attempts: Option<u32>,
    /// Where conflict pairs come from ("db" or "scanner")
    pub conflict_source: Option<ConflictSource>,
    pub github: GithubConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// REST API base, overridable for GitHub Enterprise
    pub api_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load the config file. An explicitly given path must exist; the
    /// default location (`<config dir>/lichen/lichen.toml`) is optional.
    pub fn load(config_file: Option<&Path>) -> Self {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    eprintln!(
                        "Error: The specified configuration file does not exist: {}",
                        path.display()
                    );
                    std::process::exit(1);
                }
                Some(path.to_path_buf())
            }
            None => dirs::config_dir()
                .map(|d| d.join("lichen").join("lichen.toml"))
                .filter(|p| p.exists()),
        };

        let mut config = match path {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Error parsing configuration file {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("Error reading configuration file {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            },
            None => Config::default(),
        };

        if config.github.token.is_none() {
            config.github.token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());
        }
        config
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("lichen"))
                .unwrap_or_else(|| PathBuf::from("lichen-data"))
        })
    }

    /// Scratch space for downloaded pull-request files
    pub fn work_dir(&self) -> PathBuf {
        self.data_dir().join("projects")
    }

    /// Where raw scanner reports are written
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir().join("results")
    }

    pub fn scanner_command(&self) -> String {
        self.scanner_command
            .clone()
            .unwrap_or_else(|| "scanoss-py".to_string())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(4)
    }

    pub fn conflict_source(&self) -> ConflictSource {
        self.conflict_source.unwrap_or_default()
    }

    pub fn github_api_url(&self) -> String {
        self.github
            .api_url
            .clone()
            .unwrap_or_else(|| "https://api.github.com".to_string())
    }
}
