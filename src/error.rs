use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::ingest::PayloadError;
use crate::mining::MiningError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Database(sqlx::Error),
    Mining(MiningError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
            AppError::Mining(err) => write!(f, "Mining Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Mining(err) => {
                tracing::error!("Mining job failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("DFG generation failed at {} step", err.stage()),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MiningError> for AppError {
    fn from(err: MiningError) -> Self {
        match err {
            MiningError::Storage(e) => AppError::Database(e),
            other => AppError::Mining(other),
        }
    }
}
