pub mod events;
pub mod mining;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/endpoint", post(events::receive))
        .route("/api/data", get(events::list))
}

pub fn mining_routes() -> Router<SharedState> {
    Router::new().route("/generate-dfg", get(mining::generate_dfg))
}
