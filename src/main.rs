mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use repository::Database;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });
    tracing::info!("Successfully loaded notes-api config");

    // Pool creation, extensions and migrations
    let db = Database::connect(&cfg.database_url).unwrap_or_else(|e| {
        tracing::error!("Failed to set up database pool: {e}");
        panic!("failed to set up database pool: {e}");
    });

    db.bootstrap().await.unwrap_or_else(|e| {
        tracing::error!("Failed to bootstrap database: {e}");
        panic!("failed to bootstrap database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(db));

    // Router config
    let cors = handlers::cors_layer(&cfg.allowed_origins(), cfg.cors.origin_regex.as_deref())
        .unwrap_or_else(|e| {
            tracing::error!("Invalid CORS origin pattern: {e}");
            panic!("invalid CORS origin pattern: {e}");
        });
    let router = handlers::router(service, cors);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.bind_addr);
            panic!("failed to bind to {}: {e}", cfg.bind_addr);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notes API starting, listening on {}", addr),
        Err(_) => tracing::info!("Notes API starting, listening on {}", cfg.bind_addr),
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to run HTTP server: {e}");
    }

    tracing::info!("service is stopped.");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
