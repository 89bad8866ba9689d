use clap::Args;
use std::path::PathBuf;

use super::{read_log, resolve_log_path, OutputFormat};
use healthlog::config::Config;

/// Parse a log file and print the records it contains
#[derive(Args)]
pub struct ParseCommand {
    /// Log file (defaults to log_path from config)
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ParseCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let path = resolve_log_path(&self.file, config)?;
        let days = read_log(&path)?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&days)?);
            }
            OutputFormat::Text => {
                for day in &days {
                    println!("{}", day);
                }
                let meals: usize = days.iter().map(|d| d.meals.len()).sum();
                let items: usize = days.iter().map(|d| d.item_count()).sum();
                eprintln!(
                    "{} day(s), {} meal(s), {} item(s)",
                    days.len(),
                    meals,
                    items
                );
            }
        }

        Ok(())
    }
}
