// Variance Ledger - Web Server
// REST API with Axum over an in-memory ledger

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use variance_ledger::api::{router, AppState};
use variance_ledger::{open_ledger, LedgerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional: ledger-server --config path/to/ledger.toml
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let config = LedgerConfig::discover(config_path.as_deref(), Path::new("."))?;
    let bind = config.server.bind.clone();

    let ledger = open_ledger(config)?;
    let app = router(AppState::new(ledger));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    info!(address = %bind, "ledger server listening");
    println!("🚀 Server running on http://{}", bind);
    println!("   API: http://{}/api/categories", bind);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
