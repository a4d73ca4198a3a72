// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! vk-friends CLI - export a VK user's friend list from the command line.
//!
//! # Examples
//!
//! ```bash
//! # CSV report in the current directory
//! vk-friends -a "$TOKEN" -u 1
//!
//! # JSON report at a specific path
//! vk-friends -a "$TOKEN" -u 1 -f json -p ./friends
//!
//! # First 250 friends after skipping 10
//! vk-friends -a "$TOKEN" -u 1 -l 250 -o 10
//! ```

mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vkfriends_core::{FetchConfig, ReportFormat};
use vkfriends_report::VkFriends;

use settings::Settings;

/// Width of the rule printed above a failure.
const ERROR_RULE_WIDTH: usize = 50;

// ============================================================================
// CLI Definition
// ============================================================================

/// vk-friends CLI - export a VK user's friend list.
#[derive(Debug, Parser)]
#[command(name = "vk-friends")]
#[command(about = "Export a VK user's friend list to CSV, TSV or JSON")]
#[command(long_about = r#"
Fetches the friend list of a VK user page by page through the friends.get
method and writes it into a report file.

Supported formats:
  • csv   comma-separated, UTF-8 with BOM
  • tsv   tab-separated, UTF-8 with BOM
  • json  single JSON document

Examples:
  vk-friends -a TOKEN -u 1                   # ./report.csv
  vk-friends -a TOKEN -u 1 -f json -p out    # ./out.json
  vk-friends -a TOKEN -u 1 -l 50 -c 10       # first 50 friends, 10 per request
"#)]
#[command(version)]
pub struct Cli {
    /// Access token for the VK API.
    #[arg(long, short = 'a', env = "VK_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: String,

    /// Id of the user whose friends are exported.
    #[arg(long, short = 'u', env = "VK_USER_ID")]
    pub user_id: String,

    /// Report format (csv, tsv or json).
    #[arg(long, short = 'f', default_value = "csv")]
    pub report_format: String,

    /// Report file or directory.
    #[arg(long, short = 'p', default_value = "./")]
    pub report_path: PathBuf,

    /// API version [default: 5.131].
    #[arg(long, short = 'v')]
    pub api_version: Option<String>,

    /// Request timeout in seconds [default: 30].
    #[arg(long, short = 't')]
    pub request_timeout: Option<u64>,

    /// Maximum number of friends to export.
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Number of friends to skip.
    #[arg(long, short = 'o', default_value_t = 0)]
    pub offset: u32,

    /// Friends requested per page [default: 100].
    #[arg(long, short = 'c')]
    pub count: Option<u32>,

    /// API base URL [default: https://api.vk.com].
    #[arg(long)]
    pub api_url: Option<String>,

    /// Comma-separated list of fields to export.
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Settings file [default: <config dir>/vk-friends/settings.json].
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long)]
    pub verbose: bool,

    /// Quiet mode (no log output).
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Builds the run configuration from flags, falling back to `settings`.
    fn fetch_config(&self, settings: Settings) -> Result<FetchConfig> {
        let request_timeout = self
            .request_timeout
            .map_or_else(|| settings.request_timeout(), Duration::from_secs);

        let config = FetchConfig::builder(&self.auth_token, &self.user_id)
            .api_url(self.api_url.clone().unwrap_or(settings.api_url))
            .api_version(self.api_version.clone().unwrap_or(settings.api_version))
            .fields(self.fields.clone().unwrap_or(settings.fields))
            .count(self.count.unwrap_or(settings.count))
            .limit(self.limit)
            .offset(self.offset)
            .request_timeout(request_timeout)
            .build()?;
        Ok(config)
    }
}

/// CLI exit codes.
#[repr(u8)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Report generation failed.
    Error = 1,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Filter used when `RUST_LOG` is unset. Covers the library crates
/// (`vkfriends_*`) and this binary (`vk_friends`).
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "vkfriends=debug,vk_friends=debug,info"
    } else {
        "vkfriends=info,vk_friends=info"
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => {
            eprintln!("Generating of report failed, due to following error:");
            eprintln!("{}", "=".repeat(ERROR_RULE_WIDTH));
            eprintln!("{e:#}");
            ExitCode::Error.into()
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let format: ReportFormat = cli.report_format.parse()?;
    let settings = Settings::load(cli.config.as_deref())?;
    let config = cli.fetch_config(settings)?;
    debug!(?config, %format, "Starting export");

    VkFriends::new(config, format, &cli.report_path)
        .generate_report()
        .await?;
    Ok(())
}
