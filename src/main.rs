//! Tarefas - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the task API and the browser client.

use tarefas::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tarefas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: store={}, database={}, static_dir={}",
        config.store.kind.as_str(),
        config
            .store
            .database_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(in memory)".to_string()),
        config.static_dir.display()
    );

    api::serve(config).await?;

    Ok(())
}
