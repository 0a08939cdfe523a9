//! Store Sales API Library
//!
//! Customers, products and sales for a small store, served over REST.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::services::sales::SalesPolicy;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires the services over `db` using the limits in `config`
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let policy = SalesPolicy {
            max_sales_per_day: config.max_sales_per_day,
        };
        let services = handlers::AppServices::new(db.clone(), policy);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Routes served under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/customers", handlers::customers::customer_routes())
        .nest("/products", handlers::products::product_routes())
        .nest("/sales", handlers::sales::sale_routes())
        .nest("/files", handlers::files::file_routes())
}

/// Full application router: v1 API, Swagger UI, HTTP tracing and request ids.
///
/// CORS and compression are layered on by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

/// Service and version information
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Service status")
    ),
    tag = "Health"
)]
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "store-sales-api",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "max_sales_per_day": state.config.max_sales_per_day,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Database connectivity check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, db_status) = match db::check_connection(&state.db).await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        status,
        Json(json!({
            "status": db_status,
            "checks": {
                "database": db_status,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
