use std::sync::Arc;

use anyhow::Context;
use lacuna_core::{Lacuna, LacunaConfig, TableLoader};
use lacuna_server::{ServerConfig, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let loader = TableLoader::default();
    let tables = loader
        .load()
        .with_context(|| format!("Failed to load lookup tables from {}", loader.dir().display()))?;
    let lacuna = Arc::new(Lacuna::with_config(tables, LacunaConfig::default()));

    let app = router(lacuna, &config.public_dir, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, public = %config.public_dir.display(), "listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
