use serde::{Deserialize, Serialize};

use stockyard_catalog::{ProductId, WarehouseId};
use stockyard_core::field::non_blank;
use stockyard_core::{DomainError, DomainResult, Entity, Id};

stockyard_core::id_newtype!(
    /// Inventory line item identifier (always generated).
    InventoryItemId,
    "InventoryItemId"
);

/// A quantity of one product held in one warehouse.
///
/// `product_id` is not checked against the catalog: a line may outlive the
/// product it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: InventoryItemId,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    quantity: i64,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            id,
            warehouse_id,
            product_id,
            quantity,
        })
    }

    pub fn id_typed(&self) -> &InventoryItemId {
        &self.id
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Whether this line is stored under `warehouse_id` (composite-key lookups).
    pub fn belongs_to(&self, warehouse_id: &WarehouseId) -> bool {
        self.warehouse_id == *warehouse_id
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: AddInventoryItem. The warehouse comes from the route, not the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInventoryItem {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

impl AddInventoryItem {
    /// Validate the command and produce the line to insert under a fresh id.
    pub fn into_item(self, warehouse_id: WarehouseId) -> DomainResult<InventoryItem> {
        let product_id = non_blank(self.product_id);

        let mut missing = Vec::new();
        if product_id.is_none() {
            missing.push("productId");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        if let Some(err) = DomainError::missing_fields(&missing) {
            return Err(err);
        }

        let product_id = ProductId::new(Id::parse(&product_id.unwrap_or_default())?);
        InventoryItem::new(
            InventoryItemId::generate(),
            warehouse_id,
            product_id,
            self.quantity.unwrap_or_default(),
        )
    }
}
