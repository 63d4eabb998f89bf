//! Error types for PaperDesk services
//!
//! Every failure that reaches the HTTP boundary is collapsed onto a fixed
//! vocabulary of error codes:
//! - `UNAUTHORIZED` / `FORBIDDEN` for missing identity or admin flag
//! - `INVALID_INPUT` for missing or malformed request fields
//! - `NOT_FOUND` for missing resources
//! - `DATABASE_UNAVAILABLE` for paper listing when the database is down
//! - `INTERNAL_ERROR` for everything else

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    InvalidInput,
    NotFound,
    InternalError,
    DatabaseUnavailable,
}

impl ErrorCode {
    /// HTTP status paired with this code
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Database unavailable: {message}")]
    DatabaseUnavailable { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden { message: message.into() }
    }

    /// Input error tied to a specific request field
    pub fn missing_field(field: &str) -> Self {
        AppError::InvalidInput {
            message: format!("Missing required field: {}", field),
            field: Some(field.to_string()),
        }
    }

    pub fn not_found(resource_type: &str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::InvalidInput { .. } => ErrorCode::InvalidInput,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::DatabaseUnavailable { .. } => ErrorCode::DatabaseUnavailable,
            AppError::Database(_)
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.code().status()
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message safe to send to the client.
    ///
    /// Client errors carry their own message; server errors are replaced with
    /// a generic one so database and driver details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.code() {
            ErrorCode::InternalError => "Internal server error".to_string(),
            ErrorCode::DatabaseUnavailable => {
                "Database is currently unavailable, please retry later".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Flat JSON error envelope: `{"error": "NOT_FOUND", "message": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Present on listing endpoints so clients can always read `data`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let detail = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %detail,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %detail,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let field = match &self {
            AppError::InvalidInput { field, .. } => field.clone(),
            _ => None,
        };
        let data = matches!(self, AppError::DatabaseUnavailable { .. })
            .then(|| serde_json::Value::Array(Vec::new()));

        let body = ErrorResponse {
            error: code,
            message: self.public_message(),
            field,
            data,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput {
            message: rejection.body_text(),
            field: None,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput {
            message: rejection.body_text(),
            field: None,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput {
            message: rejection.body_text(),
            field: None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors.field_errors().keys().next().map(|f| f.to_string());
        AppError::InvalidInput {
            message: errors.to_string(),
            field,
        }
    }
}
