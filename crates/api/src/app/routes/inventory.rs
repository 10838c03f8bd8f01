//! Inventory lines, nested under `/warehouses/:id/inventory`.
//!
//! The warehouse segment is taken as given: adding a line to an unknown
//! warehouse succeeds.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::get,
    Json, Router,
};

use stockyard_catalog::WarehouseId;
use stockyard_inventory::{AddInventoryItem, InventoryItemId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route(
            "/:id/inventory",
            get(list_items).post(add_item).put(add_item),
        )
        .route("/:id/inventory/:item", get(get_item).delete(delete_item))
}

fn parse_key(
    warehouse: &str,
    item: &str,
) -> Result<(WarehouseId, InventoryItemId), axum::response::Response> {
    Ok((dto::path_id(warehouse)?, dto::path_id(item)?))
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<AddInventoryItem>, JsonRejection>,
) -> axum::response::Response {
    let warehouse_id: WarehouseId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let cmd = match dto::body(body) {
        Ok(cmd) => cmd,
        Err(res) => return res,
    };

    match services.ledger.add_item(&warehouse_id, cmd).await {
        Ok(item) => dto::created(item.id_typed(), "Inventory item added."),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let warehouse_id: WarehouseId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.ledger.list_items(&warehouse_id).await {
        Ok(items) => dto::ok(items),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((warehouse, item)): Path<(String, String)>,
) -> axum::response::Response {
    let (warehouse_id, item_id) = match parse_key(&warehouse, &item) {
        Ok(key) => key,
        Err(res) => return res,
    };
    match services.ledger.get_item(&warehouse_id, &item_id).await {
        Ok(item) => dto::ok(item),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((warehouse, item)): Path<(String, String)>,
) -> axum::response::Response {
    let (warehouse_id, item_id) = match parse_key(&warehouse, &item) {
        Ok(key) => key,
        Err(res) => return res,
    };
    match services.ledger.delete_item(&warehouse_id, &item_id).await {
        Ok(()) => dto::no_content(),
        Err(e) => errors::service_error_to_response(e),
    }
}
