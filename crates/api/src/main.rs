use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidcat_core::store::memory::InMemoryStore;
use vidcat_db::PgStore;

use vidcat_api::config::{LogFormat, ServerConfig, StoreBackend};
use vidcat_api::router::build_app_router;
use vidcat_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidcat_api=debug,vidcat_db=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store_backend,
        ownerless_policy = %config.ownerless_policy,
        diagnostics = config.diagnostics,
        "Loaded server configuration"
    );

    let config = Arc::new(config);

    // --- Store ---
    let (state, pool) = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = vidcat_db::create_pool(database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            vidcat_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            vidcat_db::ensure_schema(&pool)
                .await
                .expect("Failed to create database schema");

            let store = Arc::new(PgStore::new(pool.clone()));
            let state = AppState::new(
                store.clone(),
                store,
                Arc::clone(&config),
                Some(pool.clone()),
            );
            (state, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            let store = Arc::new(InMemoryStore::new());
            let state = AppState::new(store.clone(), store, Arc::clone(&config), None);
            (state, None)
        }
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
