use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use configs::{AppConfig, StorageBackend};
use service::storage::{DbStorage, FileStorage, Storage};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Open the storage backend selected by configuration.
pub async fn build_storage(cfg: &AppConfig) -> Result<Arc<dyn Storage>, StartupError> {
    match cfg.storage.backend {
        StorageBackend::File => {
            common::env::ensure_data_dir(&cfg.storage.data_dir).await?;
            let store = FileStorage::open(&cfg.storage.data_dir)
                .await
                .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            Ok(Arc::new(store))
        }
        StorageBackend::Db => Ok(Arc::new(DbStorage::connect(&cfg.database).await?)),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
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
    info!("shutdown signal received");
}

/// Build the app from configuration and serve it until Ctrl+C or SIGTERM.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = build_storage(&cfg).await?;
    let app = routes::app(AppState::new(Arc::clone(&store)));

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, backend = ?cfg.storage.backend, "hbnb api listening");

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    store.close().await?;
    served?;
    info!("server stopped");
    Ok(())
}
