//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemorySessionStore, PgPageArchive},
    config::Config,
    error::ApiError,
    web::{build_router, spawn_sweeper, AppState},
};
use fake_data_core::ports::{PageArchive, SessionStore};
use fake_data_core::{FieldRegistry, PaginationController};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Optional Page Mirror ---
    let archive: Option<Arc<dyn PageArchive>> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let pg_archive = PgPageArchive::new(db_pool);
            info!("Running database migrations...");
            pg_archive.run_migrations().await?;
            info!("Database migrations complete. Generated pages will be mirrored.");
            Some(Arc::new(pg_archive) as Arc<dyn PageArchive>)
        }
        None => {
            info!("DATABASE_URL not set; page mirroring disabled.");
            None
        }
    };

    // --- 3. Session Store & Generator ---
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(config.session_ttl));
    let registry = Arc::new(FieldRegistry::standard());
    info!(field_types = registry.len(), "Field catalog loaded");
    let pagination = PaginationController::new(store.clone(), registry, config.limits());

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        pagination,
        archive: archive.clone(),
    });

    // --- 5. Background Sweeper ---
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(store, archive, config.sweep_interval, shutdown.clone());

    // --- 6. Create the Web Router ---
    let app = build_router(app_state)?;

    // --- 7. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        warn!("Session sweeper ended abnormally: {:?}", e);
    }
    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {:?}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
