use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{Clock, ScheduleSettings, SystemClock};

use crate::config::{Config, ConfigValidationError};
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{call_outcomes, call_windows, health, monitoring};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub clock: Arc<dyn Clock>,
    pub schedule: ScheduleSettings,
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, ConfigValidationError> {
    create_app_with_clock(config, pool, Arc::new(SystemClock))
}

/// Builds the router with an explicit clock. Tests pin time through this.
pub fn create_app_with_clock(
    config: Config,
    pool: PgPool,
    clock: Arc<dyn Clock>,
) -> Result<Router, ConfigValidationError> {
    let schedule = config.monitoring.schedule_settings()?;

    let state = AppState {
        pool,
        clock,
        schedule,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Monitoring console routes (v1)
    let monitoring_routes = Router::new()
        .route("/api/v1/monitoring/agenda", get(monitoring::get_agenda))
        .route(
            "/api/v1/monitoring/call-windows",
            get(call_windows::list_call_windows),
        )
        .route(
            "/api/v1/monitoring/installations/:installation_id/call-window",
            get(call_windows::get_call_window).put(call_windows::upsert_call_window),
        )
        .route(
            "/api/v1/monitoring/installations/:installation_id/calls",
            get(call_outcomes::list_installation_calls),
        )
        .route(
            "/api/v1/monitoring/calls",
            post(call_outcomes::create_call_outcome),
        )
        .route(
            "/api/v1/monitoring/calls/:outcome_id",
            patch(call_outcomes::update_call_outcome),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(monitoring_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
