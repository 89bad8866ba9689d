//! Health log dashboard server
//!
//! Serves the aggregated day view from the local store and captures freeform
//! entries into the remote store.
//!
//! # Configuration
//!
//! Environment variables:
//! - `HEALTHLOG_CONFIG`: Path to config file (default: ~/.config/healthlog/config.yaml)
//! - `HEALTHLOG_PORT`: Port to listen on (default: 8080)
//! - `HEALTHLOG_DATABASE_PATH`, `HEALTHLOG_REMOTE_URL`, `HEALTHLOG_REMOTE_API_KEY`
//!
//! # Config File Format
//!
//! ```yaml
//! database_path: health_data.db
//! remote:
//!   url: "https://project.supabase.co"
//!   api_key: "service-key"
//! server:
//!   port: 8080
//!   static_dir: dist
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthlog::config::Config;
use healthlog::db::{init_db, DayRepository};
use healthlog::remote::{RemoteStore, RestClient};
use healthlog::server::{build_router, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthlog=info,healthlog_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("HEALTHLOG_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path)?;

    tracing::info!("Database: {}", config.database_path.value.display());
    let pool = init_db(&config.database_path.value).await?;

    let remote: Option<Arc<dyn RemoteStore>> = if config.remote.is_configured() {
        let client = RestClient::from_config(&config.remote)?;
        tracing::info!("Forwarding entries to {}", client.base_url());
        Some(Arc::new(client))
    } else {
        tracing::warn!("Remote store not configured; entries will only be logged");
        None
    };

    let state = AppState {
        repo: DayRepository::new(pool),
        remote,
    };
    let app = build_router(state, config.server.static_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
