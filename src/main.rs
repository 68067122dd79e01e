use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use happy_thoughts::config::AppConfig;
use happy_thoughts::redis::RedisManager;
use happy_thoughts::repository::{RedisRepository, ThoughtStorage};
use happy_thoughts::routes;
use happy_thoughts::service::ThoughtService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    tracing::info!("Starting Happy Thoughts API");

    let config = AppConfig::load()?;

    let redis_manager = Arc::new(RedisManager::new(&config.redis).await?);
    let repository: Arc<dyn ThoughtStorage> = Arc::new(RedisRepository::new(
        redis_manager,
        config.redis.key_prefix.clone(),
    ));
    let service = Arc::new(ThoughtService::new(repository));

    let app = routes::build_router(service);

    let listen_addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Server running on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Happy Thoughts API shutting down");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
}
