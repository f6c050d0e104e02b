//! Router assembly and server lifecycle.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task_store::{self, SharedTaskStore};

use super::tasks;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task store, injected so tests can hand in a fresh instance
    pub store: SharedTaskStore,
}

impl AppState {
    pub fn new(config: Config, store: SharedTaskStore) -> Self {
        Self { config, store }
    }
}

/// Build the application router: JSON API plus the browser client as fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/tarefas", tasks::routes())
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = task_store::create_task_store(
        config.store.kind,
        config.store.database_path.clone(),
    )
    .await?;
    tracing::info!(
        "Task store initialized: backend={}, persistent={}",
        store.backend_name(),
        store.is_persistent()
    );
    if !config.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} not found; only the API will be served",
            config.static_dir.display()
        );
    }

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, store));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend_name().to_string(),
        persistent: state.store.is_persistent(),
    })
}
