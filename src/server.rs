//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, rate limiter housekeeping, and Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::slug::OsRandom;
use crate::infrastructure::persistence::PgUrlRepository;
use crate::infrastructure::rate_limit::{RateLimiters, spawn_reaper};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (retried while the database comes up)
/// - Apply migrations
/// - Per-client rate limiters and their idle sweep
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
    let link_service = Arc::new(LinkService::new(
        repository,
        Arc::new(OsRandom),
        config.base_url.clone(),
    ));

    let limiters = Arc::new(RateLimiters::new(
        config.shorten_policy()?,
        config.redirect_policy()?,
        config.limiter_idle_ttl(),
    ));
    let reaper = spawn_reaper(limiters.clone(), config.limiter_sweep_interval());

    let state = AppState::new(
        link_service,
        limiters,
        config.allowed_origin_header()?,
        config.trust_forwarded_for,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    reaper.abort();
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the connection pool, retrying at a fixed interval.
async fn connect_pool(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout));

    retry_fixed(
        config.db_connect_retry_interval_ms,
        config.db_connect_retries,
        |attempt| {
            let options = options.clone();
            let url = config.database_url.clone();
            async move {
                options.connect(&url).await.inspect_err(|e| {
                    tracing::warn!(attempt, error = %e, "Database connection failed");
                })
            }
        },
    )
    .await
    .context("Failed to connect to database")
}

/// Runs `op` once, then up to `retries` more times `interval_ms` apart while it fails.
///
/// `op` receives the 1-based attempt number.
async fn retry_fixed<T, E, F, Fut>(interval_ms: u64, retries: usize, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let strategy = FixedInterval::from_millis(interval_ms).take(retries);

    let mut attempt = 0;
    Retry::start(strategy, || {
        attempt += 1;
        op(attempt)
    })
    .await
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
