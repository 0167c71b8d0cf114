//! liftlog - A workout tracking service with token-based authentication
//!
//! This is the main entry point for the liftlog application.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use liftlog::auth::{AuthConfig, AuthManager, TokenPurger};
use liftlog::config::Config;
use liftlog::database::SqliteDatabase;
use liftlog::logging::init_tracing;
use liftlog::server::{AppState, Server};

/// liftlog - A workout tracking service with token-based authentication
#[derive(Parser, Debug)]
#[command(name = "liftlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "LIFTLOG_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting liftlog");

    // Initialize database
    let database = SqliteDatabase::new(&config.database.path).await?;
    let database = Arc::new(database);
    info!(path = %config.database.path, "Database initialized");

    // Initialize authentication manager
    let auth_config = AuthConfig {
        token_ttl: chrono::Duration::hours(config.auth.token_ttl_hours),
    };
    let auth_manager = Arc::new(AuthManager::new(Arc::clone(&database), auth_config));
    info!(
        token_ttl_hours = config.auth.token_ttl_hours,
        "Authentication manager initialized"
    );

    // Start the expired-token purge task
    let (shutdown_tx, _) = broadcast::channel(1);
    let purger = TokenPurger::new(
        Arc::clone(&auth_manager),
        Duration::from_secs(config.auth.purge_interval_secs),
        shutdown_tx.subscribe(),
    );
    let purge_handle = tokio::spawn(purger.run());

    // Create application state
    let state = AppState {
        auth_manager,
        database,
    };

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), state);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    // Run the server until a shutdown signal arrives
    let result = server.run(shutdown_signal()).await;

    // Stop background tasks
    if shutdown_tx.send(()).is_err() {
        error!("Purge task already stopped");
    }
    if let Err(e) = purge_handle.await {
        error!(error = %e, "Token purge task panicked");
    }

    info!("liftlog shutdown complete");

    result.map_err(Into::into)
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
