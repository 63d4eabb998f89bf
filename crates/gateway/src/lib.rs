//! PaperDesk API Gateway
//!
//! HTTP JSON API over the PaperDesk services:
//! - Paper browsing and search
//! - Per-user favorites library
//! - Recommendations
//! - Model provider settings (admin)
//!
//! The binary in `main.rs` wires configuration, logging and the metrics
//! recorder around [`create_router`].

pub mod extract;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use paperdesk_common::{config::AppConfig, db::DbPool, Repository, Services};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub services: Services,
    /// Installed Prometheus recorder, if any
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DbPool) -> Self {
        let services = Services::new(Repository::new(db.clone()));
        Self {
            config,
            db,
            services,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::new(state.config.request_timeout());
    let concurrency = ConcurrencyLimitLayer::new(state.config.server.max_concurrent_requests);

    let api_routes = Router::new()
        // Paper endpoints
        .route("/papers", get(handlers::papers::list_papers))
        .route("/papers/{id}", get(handlers::papers::get_paper))

        // Library endpoints (identity required)
        .route(
            "/library",
            get(handlers::library::list_library)
                .post(handlers::library::add_to_library)
                .delete(handlers::library::remove_from_library),
        )
        .route("/library/check", get(handlers::library::check_library))

        // Recommendation endpoints (identity required)
        .route("/recommend", get(handlers::recommend::recommend))
        .route("/recommend/interactions", post(handlers::recommend::record_interaction))

        // Settings endpoints (admin flag required)
        .route(
            "/settings/model-providers",
            get(handlers::providers::list_providers).post(handlers::providers::create_provider),
        )
        .route(
            "/settings/model-providers/{id}",
            get(handlers::providers::get_provider)
                .patch(handlers::providers::update_provider)
                .delete(handlers::providers::delete_provider),
        )
        .route(
            "/settings/model-providers/{id}/toggle",
            post(handlers::providers::toggle_provider),
        );

    // Compose the app
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(timeout)
        .layer(concurrency)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}
