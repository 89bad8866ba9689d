use clap::{Args, Subcommand};

use super::OutputFormat;
use healthlog::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        // api_key is never serialized in full
                        let mut value = serde_json::to_value(config)?;
                        value["remote"]["api_key"] = config.remote.masked_key().into();
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!(
                            "database_path: {}",
                            config.database_path.value.display()
                        );
                        println!("  source: {}", config.database_path.source);
                        println!();

                        match &config.log_path {
                            Some(log_path) => {
                                println!("log_path: {}", log_path.value.display());
                                println!("  source: {}", log_path.source);
                            }
                            None => println!("log_path: (not set)"),
                        }
                        println!();

                        println!(
                            "remote.url: {}",
                            config.remote.url.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "remote.api_key: {}",
                            config
                                .remote
                                .masked_key()
                                .unwrap_or_else(|| "(not set)".to_string())
                        );
                        println!();

                        println!("server: {}:{}", config.server.bind, config.server.port);
                        if let Some(dir) = &config.server.static_dir {
                            println!("  static_dir: {}", dir.display());
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
