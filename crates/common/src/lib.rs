//! PaperDesk Common Library
//!
//! Shared code for the PaperDesk gateway including:
//! - Database models, schema bootstrap and repository
//! - Library, recommendation, paper and model-provider services
//! - Error types and handling
//! - Configuration management
//! - Request principal extraction
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod services;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use services::Services;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
