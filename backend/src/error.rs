//! Error handling for the freight enquiry service
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FormError, ValidationError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Enquiry has {} invalid field(s)", .0.len())]
    InvalidEnquiry(Vec<ValidationError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Form errors
    #[error("Locked field: {0}")]
    LockedField(String),

    // External service errors
    #[error("Directory service error: {0}")]
    DirectoryService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Invalid(errors) => AppError::InvalidEnquiry(errors),
            FormError::FieldLocked { .. } => AppError::LockedField(err.to_string()),
            FormError::ServiceNotFound(_)
            | FormError::DimensionRowNotFound { .. }
            | FormError::ContainerNotFound { .. } => AppError::NotFound(err.to_string()),
            FormError::FieldNotApplicable { field, .. } => AppError::Validation {
                field: field.to_string(),
                message: err.to_string(),
            },
            FormError::LastContainer { .. } => AppError::ValidationError(err.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            details: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            ),
            AppError::InvalidEnquiry(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    details: errors.clone(),
                    ..ErrorDetail::new("INVALID_ENQUIRY", self.to_string())
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::LockedField(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail::new("LOCKED_FIELD", msg.clone()),
            ),
            AppError::DirectoryService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "DIRECTORY_SERVICE_ERROR",
                    format!("Directory service error: {}", msg),
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
