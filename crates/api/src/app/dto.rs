use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

// Registration bodies deserialize straight into the domain commands
// (`RegisterProduct`, `RegisterWarehouse`, `AddInventoryItem`).

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Unwrap an extracted JSON body, turning any rejection (bad syntax, wrong
/// field types, missing content type) into a 400 validation error.
pub fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )),
    }
}

/// 201 `{ id, message }` for a freshly created record.
pub fn created(id: impl std::fmt::Display, message: &str) -> axum::response::Response {
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id.to_string(),
            "message": message,
        })),
    )
        .into_response()
}

pub fn ok<T: serde::Serialize>(value: T) -> axum::response::Response {
    (StatusCode::OK, Json(value)).into_response()
}

pub fn no_content() -> axum::response::Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Parse an id taken from the path; a malformed id is a 400.
pub fn path_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: std::str::FromStr<Err = stockyard_core::DomainError>,
{
    raw.parse()
        .map_err(|e: stockyard_core::DomainError| errors::service_error_to_response(e.into()))
}
