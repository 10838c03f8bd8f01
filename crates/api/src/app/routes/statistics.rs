use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/capacity", get(capacity))
        .route("/categories", get(categories))
}

pub async fn capacity(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.statistics.capacity().await {
        Ok(stats) => dto::ok(stats),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.statistics.category_counts().await {
        Ok(counts) => dto::ok(counts),
        Err(e) => errors::service_error_to_response(e),
    }
}
