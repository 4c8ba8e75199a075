use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

mod api;
mod config;
mod db;
mod error;
mod recommend;
mod search;
mod service;
mod store;
mod tools;

use crate::config::ServiceConfig;
use crate::db::Database;
use crate::error::ServiceResult;
use crate::service::ToolboxService;
use crate::store::{DocumentStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("Starting AI Toolbox API v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(ServiceConfig::load()?);
    info!(
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    // The store handle lives for the whole process and is shared read-only
    let store = open_store(&config)?;
    info!(name = ?store.name(), "Document store ready");

    let service = Arc::new(ToolboxService::new(store, config.clone()));
    let app = api::router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn open_store(config: &ServiceConfig) -> ServiceResult<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let path = Database::path_from_url(url);
            let db = Database::open(path, config.database_name.clone())?;
            info!(path = %path.display(), "Database initialized");
            Ok(Arc::new(db))
        }
        None => {
            warn!("DATABASE_URL not set, tools will be kept in memory only");
            Ok(Arc::new(MemoryStore::new(config.database_name.clone())))
        }
    }
}

/// Log filter used when `RUST_LOG` is unset: service events plus one span per
/// HTTP request from the trace layer
const DEFAULT_LOG_FILTER: &str = "toolbox_service=info,tower_http=info";

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
