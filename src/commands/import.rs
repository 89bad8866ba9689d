use clap::Args;
use std::path::PathBuf;

use super::{read_log, resolve_log_path};
use healthlog::config::Config;
use healthlog::db::DayRepository;

/// Parse a log file and store every day in the local database
#[derive(Args)]
pub struct ImportCommand {
    /// Log file (defaults to log_path from config)
    file: Option<PathBuf>,
}

impl ImportCommand {
    pub async fn run(
        &self,
        repo: &DayRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = resolve_log_path(&self.file, config)?;
        let days = read_log(&path)?;

        let mut meals = 0;
        let mut items = 0;
        for day in &days {
            repo.save(day).await?;
            meals += day.meals.len();
            items += day.item_count();
            tracing::debug!(date = %day.date, "imported");
        }

        println!(
            "Imported {} day(s), {} meal(s), {} item(s) from {}",
            days.len(),
            meals,
            items,
            path.display()
        );
        Ok(())
    }
}
