//! Statistics Engine.
//!
//! Derived aggregates over the storage backend: capacity usage across all
//! warehouses, the monetary value of one warehouse's inventory, and product
//! counts per category. Every operation is a read; the backend runs the
//! aggregation and this module shapes the result.

use std::sync::Arc;

use serde::Serialize;

use stockyard_catalog::WarehouseId;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{CategoryCount, StatisticsStore, ValuationLine, WarehouseStore};

/// Capacity usage across every warehouse.
///
/// `free_capacity` is `total - used` and goes negative when stored quantities
/// exceed declared capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityStatistics {
    pub total_capacity: i64,
    pub used_capacity: i64,
    pub free_capacity: i64,
}

/// Monetary value of one warehouse's inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseValue {
    pub warehouse_id: WarehouseId,
    pub value: f64,
    /// Lines whose product no longer exists; they contribute 0.
    pub unpriced_lines: u64,
}

pub struct StatisticsEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S> StatisticsEngine<S>
where
    S: StatisticsStore + WarehouseStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn capacity(&self) -> ServiceResult<CapacityStatistics> {
        let totals = self.store.capacity_totals().await?;
        Ok(CapacityStatistics {
            total_capacity: totals.total_capacity,
            used_capacity: totals.used_capacity,
            free_capacity: totals.total_capacity.saturating_sub(totals.used_capacity),
        })
    }

    /// Σ quantity × price over the warehouse's lines (left join on products).
    ///
    /// Fails with not-found for an unknown warehouse; a warehouse with no lines
    /// is worth 0.
    pub async fn warehouse_value(&self, warehouse_id: &WarehouseId) -> ServiceResult<WarehouseValue> {
        if self.store.get_warehouse(warehouse_id).await?.is_none() {
            return Err(ServiceError::not_found("warehouse"));
        }

        let lines = self.store.valuation_lines(warehouse_id).await?;
        if lines.is_empty() {
            tracing::debug!(warehouse_id = %warehouse_id, "no inventory lines; value is 0");
        }

        let (value, unpriced_lines) = value_of(&lines);
        if unpriced_lines > 0 {
            tracing::warn!(
                warehouse_id = %warehouse_id,
                unpriced_lines,
                "inventory references missing products"
            );
        }

        Ok(WarehouseValue {
            warehouse_id: warehouse_id.clone(),
            value,
            unpriced_lines,
        })
    }

    /// One entry per distinct category, sorted by category.
    pub async fn category_counts(&self) -> ServiceResult<Vec<CategoryCount>> {
        let mut counts = self.store.category_counts().await?;
        counts.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(counts)
    }
}

/// Sum the joined lines. A line without a product contributes 0 and is counted
/// as unpriced.
pub fn value_of(lines: &[ValuationLine]) -> (f64, u64) {
    lines.iter().fold((0.0, 0), |(value, unpriced), line| match line.price {
        Some(price) => (value + line.quantity as f64 * price, unpriced),
        None => (value, unpriced + 1),
    })
}
