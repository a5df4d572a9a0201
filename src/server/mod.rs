//! HTTP server setup

use crate::api;
use crate::config::{Config, StoreBackend};
use crate::domain::user::APPLE_IDENTIFIER_FIELD;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, MySqlDocumentStore};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Open the document store selected by configuration
pub async fn connect_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory user store; users are lost on restart");
            Ok(Arc::new(
                MemoryDocumentStore::new()
                    .with_unique_field(&config.store.users_collection, APPLE_IDENTIFIER_FIELD),
            ))
        }
        StoreBackend::MySql => {
            let database = config.database()?;
            let pool = MySqlPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .connect(&database.url)
                .await?;
            info!("Connected to MySQL document store");
            Ok(Arc::new(MySqlDocumentStore::new(pool)))
        }
    }
}

/// Run the HTTP server
pub async fn run(config: Config, metrics_handle: Option<PrometheusHandle>) -> Result<()> {
    let store = connect_store(&config).await?;
    let http_addr = config.http_addr();

    let state = AppState::new(config, store).with_metrics(metrics_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        .route("/metrics", get(api::metrics::metrics_handler))
        // Auth endpoints
        .route("/api/v1/auth/apple", post(api::auth::apple_sign_in))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(state)
}
