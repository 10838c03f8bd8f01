use axum::{routing::post, Router};

pub mod inventory;
pub mod products;
pub mod statistics;
pub mod system;
pub mod warehouses;

/// Router for every resource endpoint (everything except `/health`).
pub fn router() -> Router {
    Router::new()
        .route("/cleanup", post(system::cleanup))
        .nest("/products", products::router())
        .nest("/warehouses", warehouses::router().merge(inventory::router()))
        .nest("/statistics", statistics::router())
}
