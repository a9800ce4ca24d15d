//! EventHub HTTP server binary.

use eventhub_server::{build_router, AppState, Config};
use eventhub_core::persistence::{Backend, JsonFileBackend, MemoryBackend};
use eventhub_core::EventHub;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub=info,eventhub_core=info,eventhub_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EventHub HTTP Server");

    let config = Config::from_env();

    let backend: Arc<dyn Backend> = match &config.storage.data_dir {
        Some(dir) => {
            info!(data_dir = %dir.display(), "using JSON file storage");
            Arc::new(JsonFileBackend::open(dir)?)
        }
        None => {
            info!("using in-memory storage; state is lost on shutdown");
            Arc::new(MemoryBackend::new())
        }
    };

    let hub = Arc::new(EventHub::open(backend).await?);
    if config.storage.seed {
        let seeded = hub.seed().await?;
        if seeded.is_empty() {
            info!("catalog already populated; seed skipped");
        } else {
            info!(events = seeded.len(), "sample catalog seeded");
        }
    }

    let router = build_router(AppState::new(hub));
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
