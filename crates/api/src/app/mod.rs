//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage selection and the managers built on top of it
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: body extraction and JSON response helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services))))
}
