use linkor::api;
use linkor::config::Config;
use linkor::core::repository::UserRepository;
use linkor::infrastructure::store::{DocumentStore, in_memory::InMemoryDocumentStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(?config, "configuration loaded");

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::open(&config.store_project_id));
    let repo = Arc::new(UserRepository::new(store.clone()));
    let app = api::app(repo, config.request_timeout);

    let addr = config.addr();
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await?;
    Ok(())
}
