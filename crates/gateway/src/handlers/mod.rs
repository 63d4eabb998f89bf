//! API handlers module
//!
//! Handlers stay thin: resolve the principal, check inputs, make one
//! service call and shape the JSON.

pub mod health;
pub mod library;
pub mod papers;
pub mod providers;
pub mod recommend;

use axum::http::Uri;
use paperdesk_common::{
    config::PaginationConfig,
    errors::AppError,
    services::{PageRequest, Pagination},
};
use serde::{Deserialize, Serialize};

/// `page` / `pageSize` query parameters, kept raw so bad values fall back
/// to defaults instead of rejecting the request
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn resolve(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.page_size.as_deref(), config)
    }
}

/// `{"data": [...], "pagination": {...}}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> SuccessResponse<T> {
    pub fn with(data: T) -> Self {
        Self { success: true, data: Some(data) }
    }
}

impl SuccessResponse<()> {
    pub fn ok() -> Self {
        Self { success: true, data: None }
    }
}

/// Non-empty query/body field or `INVALID_INPUT` naming it
pub fn require_param(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found("Route", uri.path())
}
