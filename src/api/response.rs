//! Response types for the configuration service.
//!
//! This module defines the validation report returned by `/validate` and
//! the error body used when a request cannot be processed at all.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::{ConfigError, ConfigErrorKind};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates the error returned when the request body is empty.
    pub fn empty_document() -> Self {
        Self::with_details(
            "EMPTY_DOCUMENT",
            "Request body is empty",
            "Send the YAML configuration document as the request body",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// A single problem found in a submitted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The category of the problem.
    pub kind: ConfigErrorKind,
    /// The offending section or dotted field path.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl From<&ConfigError> for ValidationIssue {
    fn from(error: &ConfigError) -> Self {
        Self {
            kind: error.kind(),
            path: error.path().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result of validating a submitted document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Correlation ID of the request that produced this report.
    pub request_id: Uuid,
    /// When the document was checked.
    pub checked_at: DateTime<Utc>,
    /// Whether the document is a valid run configuration.
    pub valid: bool,
    /// Every problem found, in document order.
    pub issues: Vec<ValidationIssue>,
    /// The loaded configuration, present only when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<RunConfig>,
}

impl ValidationReport {
    /// Builds a report from the outcome of a validation pass.
    pub fn new(request_id: Uuid, outcome: Result<RunConfig, Vec<ConfigError>>) -> Self {
        let (config, issues) = match outcome {
            Ok(config) => (Some(config), Vec::new()),
            Err(errors) => (None, errors.iter().map(ValidationIssue::from).collect()),
        };
        Self {
            request_id,
            checked_at: Utc::now(),
            valid: config.is_some(),
            issues,
            config,
        }
    }

    /// Returns the HTTP status matching this report.
    pub fn status(&self) -> StatusCode {
        if self.valid {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}
