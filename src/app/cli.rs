//! Command line interface

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lichen",
    version,
    about = "Pull request license scanner",
    long_about = "Scans the changed files of pull requests for license \
                  declarations, matches them against a conflict table, and \
                  reports the result back to the hosting platform."
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the license catalog, task queue, and results
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format: text, ext, or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Scan a single pull request (REST API URL) and exit
    #[arg(long, value_name = "PR_API_URL")]
    pub rescan: Option<String>,

    /// Head commit to scan in --rescan mode
    #[arg(long, value_name = "SHA", requires = "rescan")]
    pub commit: Option<String>,
}
