//! Haulbook API Server
//!
//! Main entry point for the Haulbook backend service.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haulbook_api::{AppState, create_router};
use haulbook_core::storage::{AttachmentStore, StorageConfig, StorageProvider};
use haulbook_db::connect;
use haulbook_shared::AppConfig;
use haulbook_shared::config::StorageBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haulbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create the attachment store
    let provider = match config.storage.backend.clone() {
        StorageBackend::Local { root } => StorageProvider::local_fs(root),
        StorageBackend::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        } => StorageProvider::s3(endpoint, bucket, access_key_id, secret_access_key, region),
        StorageBackend::AzureBlob {
            account,
            access_key,
            container,
        } => StorageProvider::azure_blob(account, access_key, container),
    };
    let uploads_root = provider.local_root().map(std::path::Path::to_path_buf);
    let storage_config = StorageConfig::new(provider)
        .with_max_upload_bytes(config.storage.max_upload_bytes);
    let store = AttachmentStore::from_config(storage_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize attachment store: {e}"))?;
    info!(
        provider = store.config().provider.name(),
        "Attachment store configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        store: Arc::new(store),
    };

    // Create router
    let mut app = create_router(state)
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes));

    // Stored blobs are publicly fetchable by reference when they live on
    // the local filesystem
    if let Some(root) = uploads_root {
        app = app.nest_service("/uploads", ServeDir::new(root));
    }

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
