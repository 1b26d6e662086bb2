use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::mining::{MiningOutcome, ARTIFACT_FILE_NAME};
use crate::state::SharedState;

/// Run the mining job. An empty store redirects back to the index with a
/// `data_empty` flag instead of failing.
pub async fn generate_dfg(State(state): State<SharedState>) -> Result<Response, AppError> {
    let artifact = state.config.artifact_path();

    match state.miner.run(&state.pool, &artifact).await? {
        MiningOutcome::EmptyData => Ok(Redirect::to("/?data_empty=true").into_response()),
        MiningOutcome::Generated(report) => Ok(Json(json!({
            "status": "success",
            "artifact": format!("/static/{ARTIFACT_FILE_NAME}"),
            "cases": report.cases,
            "events": report.events,
            "transitions": report.transitions,
        }))
        .into_response()),
    }
}
