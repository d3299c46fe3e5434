// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::models::WorkoutId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// User-correctable form input problem. Never leaves partial state behind.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Id generation collided; should be unreachable.
    #[error("Duplicate workout id: {0}")]
    DuplicateId(WorkoutId),

    /// A metric was computed from values that skipped validation.
    #[error("Invalid metric input: {0}")]
    InvalidMetricInput(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Snapshot decode error: {0}")]
    Codec(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn workout_not_found(id: WorkoutId) -> Self {
        AppError::NotFound(format!("Workout {} not found", id))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(msg.clone()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::DuplicateId(id) => {
                tracing::error!(workout_id = %id, "Duplicate workout id");
                (StatusCode::INTERNAL_SERVER_ERROR, "duplicate_id", None)
            }
            AppError::InvalidMetricInput(msg) => {
                tracing::error!(error = %msg, "Invalid metric input");
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_metric_input", None)
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Codec(msg) => {
                tracing::error!(error = %msg, "Snapshot decode error");
                (StatusCode::INTERNAL_SERVER_ERROR, "codec_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
