use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    routing::get,
    Json, Router,
};

use stockyard_catalog::{ProductFilter, ProductId, RegisterProduct};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_products).post(register_product).put(register_product),
        )
        .route("/:id", get(get_product).delete(delete_product))
}

pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterProduct>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::body(body) {
        Ok(cmd) => cmd,
        Err(res) => return res,
    };

    match services.catalog.register_product(cmd).await {
        Ok(product) => dto::created(product.id_typed(), "Product registered."),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let filter = ProductFilter {
        category: stockyard_core::field::present(query.category),
    };
    match services.catalog.list_products(&filter).await {
        Ok(products) => dto::ok(products),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.catalog.get_product(&product_id).await {
        Ok(product) => dto::ok(product),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match dto::path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.catalog.delete_product(&product_id).await {
        Ok(()) => dto::no_content(),
        Err(e) => errors::service_error_to_response(e),
    }
}
