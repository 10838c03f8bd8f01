use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::get,
    Json, Router,
};

use stockyard_catalog::{RegisterWarehouse, WarehouseId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_warehouses).post(register_warehouse).put(register_warehouse),
        )
        .route("/:id", get(get_warehouse).delete(delete_warehouse))
        .route("/:id/value", get(warehouse_value))
}

pub async fn register_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterWarehouse>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::body(body) {
        Ok(cmd) => cmd,
        Err(res) => return res,
    };

    match services.catalog.register_warehouse(cmd).await {
        Ok(warehouse) => dto::created(warehouse.id_typed(), "Warehouse registered."),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_warehouses(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_warehouses().await {
        Ok(warehouses) => dto::ok(warehouses),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let warehouse_id: WarehouseId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.catalog.get_warehouse(&warehouse_id).await {
        Ok(warehouse) => dto::ok(warehouse),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Deletes the warehouse, then its inventory lines.
pub async fn delete_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let warehouse_id: WarehouseId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.catalog.delete_warehouse(&warehouse_id).await {
        Ok(_) => dto::no_content(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn warehouse_value(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let warehouse_id: WarehouseId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.statistics.warehouse_value(&warehouse_id).await {
        Ok(value) => dto::ok(value),
        Err(e) => errors::service_error_to_response(e),
    }
}
