//! yoga-search library - read-only search and export service
//!
//! Serves grouped, alphabetized search lists of poses, series and sequences,
//! plus personal data export, over a database whose schema is owned elsewhere.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use yoga_common::config::YogaConfig;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
    /// Labels, alpha accounts and limits
    pub config: Arc<YogaConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: YogaConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let search = Router::new()
        .route("/api/search/asanas", get(api::search_asanas))
        .route("/api/search/series", get(api::search_series))
        .route("/api/search/sequences", get(api::search_sequences));

    let personal = Router::new()
        .route("/api/me/export", get(api::export_my_data))
        .route("/api/me/erasure-plan", get(api::erasure_plan));

    Router::new()
        .merge(search)
        .merge(personal)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
