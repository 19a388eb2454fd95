//! # `letterhouse` server
//!
//! Opens (and migrates) the SQLite database, then serves the letter desk over
//! HTTP until Ctrl+C or SIGTERM.
//!
//! ```bash
//! DATABASE_URL=sqlite://letterhouse.db?mode=rwc cargo run --release
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use letterhouse::config::{CliArgs, ServerConfig};
use letterhouse::manager::sqlite::SqliteStorage;
use letterhouse::server;
use letterhouse::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_tracing(config.log_format)?;
    tracing::info!(
        addr = %config.server_addr,
        db_max_connections = config.db_max_connections,
        "Starting letter desk"
    );

    // Storage failures at startup are fatal
    let storage = SqliteStorage::connect(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to initialize storage")?;

    let listener = TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    server::serve(listener, server::router(Arc::new(storage)), shutdown).await?;
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    token.cancel();
}
