use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::db;
use crate::error::AppError;
use crate::ingest;
use crate::models::EventRecord;
use crate::state::SharedState;

pub async fn receive(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let (raw, event) = ingest::parse_event(&body)
        .inspect_err(|e| tracing::debug!("Rejected event payload: {e}"))?;

    let id = db::events::insert(&state.pool, &event).await?;

    tracing::debug!(
        "Stored event {id} (case={}, activity={})",
        event.case_id,
        event.activity_code
    );

    Ok(Json(json!({
        "status": "success",
        "data_received": raw,
    })))
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<EventRecord>>, AppError> {
    let events = db::events::list_all(&state.pool).await?;
    Ok(Json(events.iter().map(EventRecord::from).collect()))
}
