//! Sync CLI commands for pushing days to the remote store.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use healthlog::config::Config;
use healthlog::db::{init_db, DayRepository};
use healthlog::models::Day;
use healthlog::remote::{RemoteError, RestClient};
use healthlog::sync::SyncEngine;

/// Push days to the remote store
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,

    /// Read days straight from a log file instead of the local database
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Only sync days on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Only sync days on or before this date (YYYY-MM-DD)
    #[arg(long)]
    until: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show remote configuration and connectivity
    Status,
}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), SyncCommandError> {
        match &self.command {
            None => self.sync(config).await,
            Some(SyncSubcommand::Status) => self.status(config).await,
        }
    }

    async fn sync(&self, config: &Config) -> Result<(), SyncCommandError> {
        let client = RestClient::from_config(&config.remote)?;
        let base_url = client.base_url().to_string();

        let days = self.load_days(config).await?;
        let total = days.len();
        let days: Vec<Day> = days
            .into_iter()
            .filter(|d| in_range(&d.date, self.since, self.until))
            .collect();
        if days.len() < total {
            tracing::debug!(kept = days.len(), total, "filtered days by date range");
        }

        if days.is_empty() {
            println!("Nothing to sync.");
            return Ok(());
        }

        let engine = SyncEngine::new(client);
        engine
            .check_connection()
            .await
            .map_err(SyncCommandError::Unreachable)?;

        println!("Syncing {} day(s) to {}...", days.len(), base_url);
        println!();

        let report = engine.sync_days(&days).await;
        println!("{}", report);

        if report.has_failures() {
            println!();
            println!("Some records failed; see the log output above for details.");
        }
        if report.meals_synced() > 0 {
            println!();
            println!("Note: meals and items are inserted on every run. Use --since to");
            println!("avoid duplicating days that were already synced.");
        }

        Ok(())
    }

    async fn load_days(&self, config: &Config) -> Result<Vec<Day>, SyncCommandError> {
        match &self.log {
            Some(path) => healthlog::parser::parse_file(path).map_err(|e| {
                SyncCommandError::Source(format!(
                    "Failed to read log file '{}': {}",
                    path.display(),
                    e
                ))
            }),
            None => {
                let pool = init_db(&config.database_path.value)
                    .await
                    .map_err(|e| SyncCommandError::Source(e.to_string()))?;
                DayRepository::new(pool)
                    .load_all()
                    .await
                    .map_err(|e| SyncCommandError::Source(e.to_string()))
            }
        }
    }

    async fn status(&self, config: &Config) -> Result<(), SyncCommandError> {
        println!("Remote Store");
        println!("============");
        println!();

        if !config.remote.is_configured() {
            println!("Status: Not configured");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  remote:");
            println!("    url: \"https://your-project.example.co\"");
            println!("    api_key: \"your-api-key\"");
            println!();
            println!("Or set environment variables:");
            println!("  HEALTHLOG_REMOTE_URL");
            println!("  HEALTHLOG_REMOTE_API_KEY");
            return Ok(());
        }

        let client = RestClient::from_config(&config.remote)?;

        println!("URL:     {}", client.base_url());
        println!(
            "API Key: {}",
            config.remote.masked_key().unwrap_or_default()
        );
        println!();

        print!("Status:  ");
        match SyncEngine::new(client).check_connection().await {
            Ok(()) => println!("✓ connected"),
            Err(RemoteError::Transport(_)) => println!("✗ unreachable"),
            Err(e) => println!("✗ error: {}", e),
        }

        Ok(())
    }
}

/// Whether `date` falls inside the optional inclusive range. Dates that do
/// not parse are kept only when no range is given.
fn in_range(date: &str, since: Option<NaiveDate>, until: Option<NaiveDate>) -> bool {
    if since.is_none() && until.is_none() {
        return true;
    }
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => since.map_or(true, |s| d >= s) && until.map_or(true, |u| d <= u),
        Err(_) => {
            tracing::warn!(%date, "skipping day with unparseable date");
            false
        }
    }
}

/// Errors from sync commands
#[derive(Debug)]
pub enum SyncCommandError {
    Remote(RemoteError),
    Unreachable(RemoteError),
    Source(String),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::Remote(e) => write!(f, "{}", e),
            SyncCommandError::Unreachable(e) => {
                write!(f, "Cannot reach the remote store: {}", e)
            }
            SyncCommandError::Source(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SyncCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncCommandError::Remote(e) | SyncCommandError::Unreachable(e) => Some(e),
            SyncCommandError::Source(_) => None,
        }
    }
}

impl From<RemoteError> for SyncCommandError {
    fn from(e: RemoteError) -> Self {
        SyncCommandError::Remote(e)
    }
}
