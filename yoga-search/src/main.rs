//! yoga-search - read-only search and export service
//!
//! Serves grouped search lists of poses, series and sequences and personal
//! data exports from the practice database.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use yoga_common::config::load_config;
use yoga_search::{build_router, db, AppState};

#[derive(Debug, Parser)]
#[command(name = "yoga-search", version, about = "Read-only yoga practice search service")]
struct Args {
    /// Config file (TOML)
    #[arg(long, env = "YOGA_CONFIG")]
    config: Option<PathBuf>,

    /// Database path, overriding the config file
    #[arg(long, env = "YOGA_DATABASE")]
    database: Option<PathBuf>,

    /// Listen address, overriding the config file
    #[arg(long, env = "YOGA_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting yoga-search v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    info!("Database path: {}", config.database_path.display());
    info!("Alpha accounts: {}", config.alpha_user_ids.len());

    let pool = match db::connect_readonly(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    let bind_address = config.bind_address.clone();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("yoga-search listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
