//! Inventory Ledger: line items scoped to a warehouse.

use std::sync::Arc;

use stockyard_catalog::WarehouseId;
use stockyard_inventory::{AddInventoryItem, InventoryItem, InventoryItemId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::InventoryStore;

/// CRUD over the `inventory_items` collection.
///
/// The warehouse id comes from the route and is not checked against the
/// `warehouses` collection.
pub struct InventoryLedger<S: ?Sized> {
    store: Arc<S>,
}

impl<S> InventoryLedger<S>
where
    S: InventoryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn add_item(
        &self,
        warehouse_id: &WarehouseId,
        cmd: AddInventoryItem,
    ) -> ServiceResult<InventoryItem> {
        let item = cmd.into_item(warehouse_id.clone())?;
        self.store.insert_item(item.clone()).await?;
        tracing::info!(
            warehouse_id = %warehouse_id,
            item_id = %item.id_typed(),
            product_id = %item.product_id(),
            quantity = item.quantity(),
            "inventory item added"
        );
        Ok(item)
    }

    /// Lines of a warehouse; empty (not an error) when there are none.
    pub async fn list_items(&self, warehouse_id: &WarehouseId) -> ServiceResult<Vec<InventoryItem>> {
        Ok(self.store.list_items(warehouse_id).await?)
    }

    pub async fn get_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> ServiceResult<InventoryItem> {
        self.store
            .get_item(warehouse_id, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("inventory item"))
    }

    pub async fn delete_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> ServiceResult<()> {
        if self.store.delete_item(warehouse_id, item_id).await? == 0 {
            return Err(ServiceError::not_found("inventory item"));
        }
        tracing::info!(warehouse_id = %warehouse_id, item_id = %item_id, "inventory item deleted");
        Ok(())
    }
}
