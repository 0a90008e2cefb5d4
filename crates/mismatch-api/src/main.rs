//! MisMatch API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mismatch_api::{create_router, AppConfig, AppState, OutfitComposer, StoreBackend};
use mismatch_core::{ClothingRepository, OutfitRepository};
use mismatch_db::{log_pool_metrics, Database, MemoryStore, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "mismatch_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mismatch_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("mismatch-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = AppConfig::from_env()?;
    info!(
        backend = ?config.backend,
        name_prefix = %config.composer.name_prefix,
        store_timeout_ms = config.composer.store_timeout.as_millis() as u64,
        enforce_categories = config.composer.enforce_categories,
        "Configuration loaded"
    );

    let (clothing, outfits) = match config.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let db = Database::connect_with_config(
                &config.database_url,
                PoolConfig::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.composer.store_timeout),
            )
            .await?;
            info!("Database connected");

            // Run pending database migrations on startup
            info!("Running database migrations...");
            db.migrate().await?;
            info!("Database migrations complete");
            log_pool_metrics(db.pool());

            let clothing: Arc<dyn ClothingRepository> = db.clothing.clone();
            let outfits: Arc<dyn OutfitRepository> = db.outfits.clone();
            (clothing, outfits)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            let store = MemoryStore::new();
            let clothing: Arc<dyn ClothingRepository> = Arc::new(store.clone());
            let outfits: Arc<dyn OutfitRepository> = Arc::new(store);
            (clothing, outfits)
        }
    };

    let composer = OutfitComposer::new(clothing, outfits, config.composer.clone());
    let app = create_router(AppState::new(composer));

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
