use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Remove every product, warehouse and inventory line.
pub async fn cleanup(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.cleanup().await {
        Ok(()) => dto::ok(serde_json::json!({ "message": "Cleanup completed." })),
        Err(e) => errors::service_error_to_response(e),
    }
}
