//! Monitor server binary
//!
//! Standalone login-monitoring server: authentication endpoint, attempt
//! history API, and the real-time monitor WebSocket channel.

use std::net::SocketAddr;

use monitor::api::routes::{create_router, AppState};
use monitor::config::ServerConfig;
use monitor::db::DatabaseConnection;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    // Load configuration; the server runs fine on defaults
    let config = match ServerConfig::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded");
            cfg
        }
        Err(e) => {
            tracing::warn!("No configuration file ({}), using defaults", e);
            ServerConfig::default()
        }
    };

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Database path: {}", config.database.path);

    let addr: SocketAddr = format!("{}:{}", config.host(), config.port()).parse()?;

    // Initialize database connection
    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url).await?;

    // Schema initialization is fatal if it fails
    tracing::info!("Running database migrations");
    db.run_migrations().await?;

    tracing::info!("Performing database health check");
    db.health_check().await?;

    // Wire up registry, publisher, and authenticator
    let state = AppState::new(db, &config);
    tracing::info!(
        "Demo users: {}",
        state.authenticator.usernames().join(", ")
    );

    // Optional global stats push; by default viewers pull stats on demand
    // and rely on the per-session idle keepalive.
    if let Some(secs) = config.monitor.stats_interval_secs {
        let publisher = state.publisher.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                publisher.publish_stats().await;
            }
        });
        tracing::info!("Global stats push enabled every {}s", secs);
    }

    let app = create_router(state);

    tracing::info!("Starting monitor server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // ConnectInfo supplies each login's source IP
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Monitor server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
