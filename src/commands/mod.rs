mod config_cmd;
mod import;
mod parse;
mod show;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use import::ImportCommand;
pub use parse::ParseCommand;
pub use show::ShowCommand;
pub use sync_cmd::SyncCommand;

use clap::ValueEnum;
use std::path::PathBuf;

use healthlog::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Log file given on the command line, else the configured one.
fn resolve_log_path(file: &Option<PathBuf>, config: &Config) -> Result<PathBuf, String> {
    file.clone()
        .or_else(|| config.log_path.as_ref().map(|p| p.value.clone()))
        .ok_or_else(|| {
            "No log file given. Pass a path or set log_path in the config file.".to_string()
        })
}

fn read_log(path: &std::path::Path) -> Result<Vec<healthlog::models::Day>, String> {
    healthlog::parser::parse_file(path)
        .map_err(|e| format!("Failed to read log file '{}': {}", path.display(), e))
}
