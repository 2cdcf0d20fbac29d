//! Response types for the allocation engine API.
//!
//! This module defines the error response structures, the conflict list
//! body, and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Conflict;

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

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    fn not_found(code: &str, kind: &str, id: &str) -> Self {
        Self::with_details(
            code,
            format!("{} not found: {}", kind, id),
            format!("No {} with id '{}' exists in the planner", kind.to_lowercase(), id),
        )
    }
}

/// Body of `GET /conflicts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictsResponse {
    /// First day scanned.
    pub scan_start: NaiveDate,
    /// Exclusive end of the scan.
    pub scan_end: NaiveDate,
    /// Number of conflicts found.
    pub count: usize,
    /// The conflicts, grouped by developer and in date order.
    pub conflicts: Vec<Conflict>,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::DeveloperNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::not_found("DEVELOPER_NOT_FOUND", "Developer", &id),
            },
            EngineError::AllocationNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::not_found("ALLOCATION_NOT_FOUND", "Allocation", &id),
            },
            EngineError::LeaveNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::not_found("LEAVE_NOT_FOUND", "Leave", &id),
            },
            EngineError::InvalidAllocation {
                allocation_id,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_ALLOCATION",
                    format!("Invalid allocation '{}': {}", allocation_id, message),
                    "The allocation data contains invalid information",
                ),
            },
            EngineError::InvalidLeave { leave_id, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_LEAVE",
                    format!("Invalid leave '{}': {}", leave_id, message),
                    "The leave data contains invalid information",
                ),
            },
            error @ EngineError::NoAlternativeDeveloper { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "NO_ALTERNATIVE_DEVELOPER",
                    error.to_string(),
                    "Name a developer explicitly to reassign anyway",
                ),
            },
            error @ EngineError::InvalidPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_PERIOD", error.to_string()),
            },
            error @ EngineError::StaleSnapshot { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "STALE_SNAPSHOT",
                    error.to_string(),
                    "The planner changed concurrently too many times; retry the request",
                ),
            },
        }
    }
}
