use std::sync::Arc;

use anyhow::Result;
use quakedb_core::AppConfig;
use quakedb_http::{create_router, AppState};
use quakedb_service::QuakeService;
use quakedb_storage::PgStorage;
use tokio::signal;

pub(crate) async fn run(config: AppConfig, host: &str, port: u16) -> Result<()> {
    std::fs::create_dir_all(&config.upload_dir)?;
    tracing::info!(db = ?config.db, upload_dir = %config.upload_dir.display(), "starting quakedb");

    let storage = PgStorage::new(&config.db);
    // Each request opens its own connection, so an unreachable database is
    // not fatal here.
    if let Err(e) = storage.ping().await {
        tracing::warn!("Database not reachable at startup: {e}");
    }

    let service = Arc::new(QuakeService::new(Arc::new(storage), config.upload_dir));
    let state = Arc::new(AppState { service, upload_limit_bytes: config.upload_limit_bytes });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
