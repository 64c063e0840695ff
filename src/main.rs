use reputation_ledger::{
    api::Server,
    config::Config,
    context::SystemClock,
    state::{SqliteStore, StateCache, StateStore},
};
use std::sync::Arc;
use tracing::info;

/// The main entry point for the validator node.
///
/// Initializes logging, loads the configuration, opens the configured state
/// store and serves the JSON-RPC API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // First argument overrides the config path
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;
    info!("Validator starting with config: {:?}", config);

    let store: Arc<dyn StateStore> = match config.storage.backend.as_str() {
        "sqlite" => Arc::new(SqliteStore::connect(&config.storage.url).await?),
        _ => Arc::new(StateCache::new()),
    };
    info!("Using {} state store", config.storage.backend);

    let server = Server::new(config, store, Arc::new(SystemClock));
    server.start().await?;

    Ok(())
}
