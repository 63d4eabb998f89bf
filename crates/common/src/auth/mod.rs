//! Request principal resolution
//!
//! There is no session or token layer yet. Identity and admin status are
//! read from request headers, with query parameters as a fallback for
//! development clients:
//! - `x-user-id` header, else `userId` query parameter
//! - `x-is-admin: true` header, else `isAdmin=true` query parameter
//!
//! Everything downstream takes a [`CurrentUser`] or [`Admin`] value, so a
//! real authentication layer only has to replace the extractors in this
//! module.

use crate::errors::{AppError, Result};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const IS_ADMIN_HEADER: &str = "x-is-admin";

/// Whatever the transport told us about the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Option<String>,
    pub is_admin: bool,
}

/// An identified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
}

/// A caller holding the admin flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub user_id: Option<String>,
}

impl CurrentUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into() }
    }

    pub fn id(&self) -> &str {
        &self.user_id
    }
}

/// Query-string fallback for identity
#[derive(Debug, Default, Deserialize)]
struct PrincipalQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "isAdmin")]
    is_admin: Option<String>,
}

impl Principal {
    /// Resolve the principal from request headers and query string
    pub fn from_parts(parts: &Parts) -> Self {
        // A malformed query string only loses the fallback, never the request
        let query = Query::<PrincipalQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        // A blank header counts as absent and falls through to the query
        let user_id = header_value(parts, USER_ID_HEADER)
            .filter(|id| !id.trim().is_empty())
            .or(query.user_id.filter(|id| !id.trim().is_empty()));

        let is_admin = header_value(parts, IS_ADMIN_HEADER).as_deref() == Some("true")
            || query.is_admin.as_deref() == Some("true");

        Self { user_id, is_admin }
    }

    /// Require an identified caller
    pub fn require_user(&self) -> Result<CurrentUser> {
        self.user_id
            .clone()
            .map(CurrentUser::new)
            .ok_or_else(|| AppError::unauthorized("Login required"))
    }

    /// Require the admin flag
    pub fn require_admin(&self) -> Result<Admin> {
        if self.is_admin {
            Ok(Admin {
                user_id: self.user_id.clone(),
            })
        } else {
            Err(AppError::forbidden("Administrator privileges required"))
        }
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Axum extractor for CurrentUser, rejecting with `UNAUTHORIZED`
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Principal::from_parts(parts).require_user()
    }
}

/// Axum extractor for Admin, rejecting with `FORBIDDEN`
impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Principal::from_parts(parts).require_admin()
    }
}
