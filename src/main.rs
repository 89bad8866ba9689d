use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, ImportCommand, ParseCommand, ShowCommand, SyncCommand};
use healthlog::config::Config;
use healthlog::db::{init_db, DayRepository};

#[derive(Parser)]
#[command(name = "healthlog")]
#[command(version)]
#[command(about = "Parse a daily sleep and nutrition log and sync it", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local database
    Init,

    /// Parse a log file and print what it contains
    Parse(ParseCommand),

    /// Store a log file in the local database
    Import(ImportCommand),

    /// Push days to the remote store
    Sync(SyncCommand),

    /// Show stored days
    Show(ShowCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthlog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Init) => {
            let path = &config.database_path.value;
            init_db(path).await?;
            println!("Database ready at {}", path.display());
        }
        Some(Commands::Parse(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Import(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = DayRepository::new(pool);
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Sync(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Show(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = DayRepository::new(pool);
            cmd.run(&repo).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
