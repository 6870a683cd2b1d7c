//! Entry point for the book order service.
//!
//! Loads `.env`, configuration and logging, connects the configured record
//! store and serves the REST API until interrupted.

use bookorders::config::{AppConfig, StorageBackend};
use bookorders::core::OrderStore;
use bookorders::server::ServerBuilder;
use bookorders::storage::InMemoryOrderStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

/// Command-line arguments for the book order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "BOOK_ORDERS_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error or full directives);
    /// overrides RUST_LOG and the configured filter
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;

    let env_filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
    };
    fmt().with_env_filter(env_filter).with_target(true).init();

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "record store ready");

    let addr = config.server.address();
    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .serve(&addr)
        .await
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryOrderStore::new())),
        StorageBackend::Mongodb => open_mongo(config).await,
    }
}

#[cfg(feature = "mongodb_backend")]
async fn open_mongo(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    use bookorders::storage::MongoOrderStore;

    let store =
        MongoOrderStore::connect(&config.storage.uri, &config.storage.database).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn open_mongo(_config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    anyhow::bail!("MongoDB storage requested but this build lacks the `mongodb_backend` feature")
}
