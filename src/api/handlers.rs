//! HTTP request handlers for the configuration service.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;

use super::request::ValidateParams;
use super::response::{ApiError, ApiErrorResponse, ValidationReport};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .route("/validate", post(validate_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /config.
///
/// Returns the run configuration the service was started with.
async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(state.config().clone()),
    )
}

/// Handler for POST /validate.
///
/// Accepts a YAML document as the request body and reports every problem
/// found in it.
async fn validate_handler(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
    body: String,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validation request");

    if body.trim().is_empty() {
        warn!(correlation_id = %correlation_id, "Empty configuration document");
        return ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::empty_document(),
        }
        .into_response();
    }

    let options = params.options(state.options());
    let start_time = Instant::now();
    let report = ValidationReport::new(
        correlation_id,
        ConfigLoader::new(options).check_str(&body),
    );
    let duration = start_time.elapsed();

    if report.valid {
        info!(
            correlation_id = %correlation_id,
            strict = options.strict,
            duration_us = duration.as_micros(),
            "Configuration is valid"
        );
    } else {
        warn!(
            correlation_id = %correlation_id,
            strict = options.strict,
            issues = report.issues.len(),
            first_issue = report.issues.first().map(|i| i.message.as_str()).unwrap_or_default(),
            "Configuration failed validation"
        );
    }

    (
        report.status(),
        [(header::CONTENT_TYPE, "application/json")],
        Json(report),
    )
        .into_response()
}
