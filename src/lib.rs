pub mod config;
pub mod error;
pub mod state;
pub mod db;
pub mod models;
pub mod ingest;
pub mod mining;
pub mod routes;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::mining::ProcessMiner;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: SqlitePool, config: Config) -> Router {
    let miner = ProcessMiner::from_config(&config);
    tracing::info!("DFG renderer: {}", miner.visualizer_name());

    build_app_with_miner(pool, config, miner)
}

/// Same as [`build_app`] but with caller-supplied mining collaborators.
pub fn build_app_with_miner(pool: SqlitePool, config: Config, miner: ProcessMiner) -> Router {
    let static_dir = config.static_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        miner,
    });

    Router::new()
        .merge(routes::api_routes())
        .merge(routes::mining_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", axum::routing::get(health))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
