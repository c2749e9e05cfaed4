//! Serves the marketplace lifecycle API over HTTP.
//!
//! Configuration is read from built-in defaults, an optional
//! `tasklance.toml`, and `TASKLANCE_*` environment variables. The process
//! exits on `SIGINT`/`SIGTERM` after in-flight requests drain.

use std::sync::Arc;

use tasklance::{
    config::{ConfigError, ServerConfig},
    db::build_pool,
    http::{AppState, StaticTokenAuthenticator, router},
    telemetry,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Failures that stop the server before or while serving.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    telemetry::init(&config.log_filter);

    if config.tokens.is_empty() {
        warn!("no bearer tokens configured; every lifecycle route will answer 401");
    }

    let pool = build_pool(&config.database_url, config.max_connections)?;
    let authenticator = Arc::new(StaticTokenAuthenticator::new(config.tokens));
    let state = AppState::postgres(&pool, authenticator);
    let app = router(state, &config.api_prefix);

    let listener = TcpListener::bind(config.bind_address).await?;
    info!(address = %config.bind_address, prefix = %config.api_prefix, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => {
                    warn!(error = %err, "cannot watch SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::select! {
            _ = interrupt => {}
            () = terminate => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _interrupted = interrupt.await;
    }
}
