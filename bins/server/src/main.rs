//! Caisse API Server
//!
//! Main entry point for the cashbox backend service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caisse_api::{AppState, create_router};
use caisse_core::media::MediaPolicy;
use caisse_core::storage::{StorageConfig, StorageProvider, StorageService};
use caisse_db::{connect, resolve_main_box};
use caisse_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caisse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Resolve the single main cashbox up front. A system with zero or more
    // than one main box is misconfigured; refuse to serve.
    let main_box_id = resolve_main_box(&db)
        .await
        .context("Failed to resolve the main cashbox")?;
    info!(main_box_id = %main_box_id, "Resolved main cashbox");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    });

    // Create storage service for proof images
    let provider = match config.storage.provider.as_str() {
        "s3" => StorageProvider::s3(
            config.storage.endpoint.as_str(),
            config.storage.bucket.as_str(),
            config.storage.region.as_str(),
        ),
        _ => StorageProvider::local_fs(PathBuf::from(&config.storage.root)),
    };
    let storage = StorageService::from_config(StorageConfig {
        provider,
        public_base_url: config.storage.public_base_url.clone(),
    })
    .context("Failed to initialize proof image storage")?;
    info!(provider = %config.storage.provider, "Proof image storage configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage: Arc::new(storage),
        media_policy: MediaPolicy::new(config.storage.max_image_bytes),
        main_box_id,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
