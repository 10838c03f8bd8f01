//! Catalog Manager: registration, lookup and deletion of products and warehouses.

use std::sync::Arc;

use stockyard_catalog::{
    Product, ProductFilter, ProductId, RegisterProduct, RegisterWarehouse, Warehouse, WarehouseId,
};
use stockyard_core::DomainError;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{InventoryStore, ProductStore, StoreError, WarehouseStore};

/// Outcome of a warehouse deletion (both cascade phases succeeded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarehouseRemoval {
    pub items_removed: u64,
}

/// CRUD over the `products` and `warehouses` collections.
pub struct CatalogManager<S: ?Sized> {
    store: Arc<S>,
}

impl<S> CatalogManager<S>
where
    S: ProductStore + WarehouseStore + InventoryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn register_product(&self, cmd: RegisterProduct) -> ServiceResult<Product> {
        let product = cmd.into_product()?;
        let id = product.id_typed().clone();

        match self.store.insert_product(product.clone()).await {
            Ok(()) => {
                tracing::info!(product_id = %id, category = product.category(), "product registered");
                Ok(product)
            }
            Err(StoreError::Duplicate { .. }) => Err(DomainError::conflict(format!(
                "product with id '{id}' already exists"
            ))
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list_products(filter).await?)
    }

    pub async fn get_product(&self, id: &ProductId) -> ServiceResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))
    }

    pub async fn delete_product(&self, id: &ProductId) -> ServiceResult<()> {
        if self.store.delete_product(id).await? == 0 {
            return Err(ServiceError::not_found("product"));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn register_warehouse(&self, cmd: RegisterWarehouse) -> ServiceResult<Warehouse> {
        let warehouse = cmd.into_warehouse()?;
        self.store.insert_warehouse(warehouse.clone()).await?;
        tracing::info!(
            warehouse_id = %warehouse.id_typed(),
            capacity = warehouse.capacity(),
            "warehouse registered"
        );
        Ok(warehouse)
    }

    pub async fn list_warehouses(&self) -> ServiceResult<Vec<Warehouse>> {
        Ok(self.store.list_warehouses().await?)
    }

    pub async fn get_warehouse(&self, id: &WarehouseId) -> ServiceResult<Warehouse> {
        self.store
            .get_warehouse(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("warehouse"))
    }

    /// Delete a warehouse and then its inventory.
    ///
    /// The two phases are independent writes, not a transaction. Between them a
    /// reader can observe the warehouse gone while its lines remain; if the
    /// second phase fails the lines stay orphaned and the error is returned.
    pub async fn delete_warehouse(&self, id: &WarehouseId) -> ServiceResult<WarehouseRemoval> {
        if self.store.delete_warehouse(id).await? == 0 {
            return Err(ServiceError::not_found("warehouse"));
        }

        match self.store.delete_items_for_warehouse(id).await {
            Ok(items_removed) => {
                tracing::info!(warehouse_id = %id, items_removed, "warehouse deleted");
                Ok(WarehouseRemoval { items_removed })
            }
            Err(e) => {
                tracing::error!(
                    warehouse_id = %id,
                    error = %e,
                    "warehouse deleted but inventory purge failed; lines are orphaned"
                );
                Err(e.into())
            }
        }
    }
}
