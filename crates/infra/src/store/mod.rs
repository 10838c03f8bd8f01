//! Storage backend abstractions.
//!
//! The backend holds three flat collections: `products`, `warehouses` and
//! `inventory_items`. Each collection gets its own trait; `StatisticsStore`
//! exposes the aggregation queries that run inside the backend (SQL
//! aggregates for Postgres, folds over the maps for the in-memory store).
//!
//! There are no cross-collection constraints: no foreign keys, no
//! multi-collection transactions.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use stockyard_catalog::{Product, ProductFilter, ProductId, Warehouse, WarehouseId};
use stockyard_inventory::{InventoryItem, InventoryItemId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryCollection, InMemoryStore};
pub use postgres::PostgresStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to domain errors (validation,
/// not-found).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same primary key already exists.
    #[error("duplicate key in {collection}: {key}")]
    Duplicate {
        collection: &'static str,
        key: String,
    },

    /// A stored row could not be turned back into a domain record.
    #[error("corrupt record in {collection}: {message}")]
    Decode {
        collection: &'static str,
        message: String,
    },

    /// The backend itself failed (connection, query, poisoned lock, ...).
    #[error("storage backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Raw capacity aggregate: Σ warehouse capacity and Σ inventory quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityTotals {
    pub total_capacity: i64,
    pub used_capacity: i64,
}

/// One row of the inventory ⟕ products join for a warehouse.
///
/// `price` is `None` when the line references a product that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationLine {
    pub quantity: i64,
    pub price: Option<f64>,
}

/// Number of products sharing one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product. Fails with `Duplicate` if the id is taken.
    async fn insert_product(&self, product: Product) -> StoreResult<()>;
    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>>;
    /// Products matching `filter`, ordered by id. No match is an empty list.
    async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;
    /// Returns the number of deleted records (0 or 1).
    async fn delete_product(&self, id: &ProductId) -> StoreResult<u64>;
}

#[async_trait]
pub trait WarehouseStore: Send + Sync {
    async fn insert_warehouse(&self, warehouse: Warehouse) -> StoreResult<()>;
    async fn get_warehouse(&self, id: &WarehouseId) -> StoreResult<Option<Warehouse>>;
    /// All warehouses, ordered by id.
    async fn list_warehouses(&self) -> StoreResult<Vec<Warehouse>>;
    async fn delete_warehouse(&self, id: &WarehouseId) -> StoreResult<u64>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn insert_item(&self, item: InventoryItem) -> StoreResult<()>;
    /// Composite lookup: the line must exist *and* belong to `warehouse_id`.
    async fn get_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<Option<InventoryItem>>;
    /// Lines of one warehouse, ordered by id.
    async fn list_items(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<InventoryItem>>;
    async fn delete_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<u64>;
    /// Delete every line of a warehouse; returns how many were removed.
    async fn delete_items_for_warehouse(&self, warehouse_id: &WarehouseId) -> StoreResult<u64>;
}

#[async_trait]
pub trait StatisticsStore: Send + Sync {
    /// Σ capacity over all warehouses and Σ quantity over all lines (0 when empty).
    async fn capacity_totals(&self) -> StoreResult<CapacityTotals>;
    /// Left outer join of a warehouse's lines against product prices.
    /// Yields no rows when the warehouse has no lines.
    async fn valuation_lines(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<ValuationLine>>;
    /// Product counts grouped by category, in backend order.
    async fn category_counts(&self) -> StoreResult<Vec<CategoryCount>>;
}

/// The full storage backend.
#[async_trait]
pub trait Storage: ProductStore + WarehouseStore + InventoryStore + StatisticsStore {
    /// Remove every record from every collection.
    async fn clear_all(&self) -> StoreResult<()>;
}
