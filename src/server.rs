//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the campaign client, the rotation
//! scheduler and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::rotation_worker::spawn_rotation_worker;
use crate::infrastructure::ads::campaign_client_from_config;
use crate::routes::app_router;
use crate::state::{AppState, StateSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Builds the connection pool from the `DB_*` settings.
///
/// # Errors
///
/// Returns an error if the database is unreachable within `DB_CONNECT_TIMEOUT`.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Campaign client (simulated or Google Ads)
/// - Rotation scheduler (unless `ROTATION_ENABLED=false`)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - The live ads client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let campaigns = campaign_client_from_config(&config)?;
    let state = AppState::new(Arc::new(pool), StateSettings::from(&config), campaigns);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if config.rotation_enabled {
        Some(spawn_rotation_worker(
            state.rotation_service.clone(),
            Duration::from_secs(config.rotation_interval_minutes * 60),
            shutdown_rx,
        ))
    } else {
        tracing::info!("Rotation scheduler disabled");
        None
    };

    let app = app_router(state, &config.cors_allow_origin);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped, waiting for scheduler");
    let _ = shutdown_tx.send(true);
    if let Some(handle) = scheduler
        && let Err(e) = handle.await
    {
        tracing::error!(error = %e, "Rotation scheduler task panicked");
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
