use serde::{Deserialize, Serialize};

use stockyard_core::field::present;
use stockyard_core::{DomainError, DomainResult, Entity};

stockyard_core::id_newtype!(
    /// Warehouse identifier (always generated).
    WarehouseId,
    "WarehouseId"
);

/// A registered warehouse. `capacity` is the maximum number of units it can
/// hold; nothing enforces it against the stored inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    id: WarehouseId,
    name: String,
    location: String,
    capacity: i64,
}

impl Warehouse {
    pub fn new(
        id: WarehouseId,
        name: impl Into<String>,
        location: impl Into<String>,
        capacity: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        let location = location.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if location.trim().is_empty() {
            return Err(DomainError::validation("location cannot be empty"));
        }
        if capacity < 0 {
            return Err(DomainError::validation("capacity cannot be negative"));
        }
        Ok(Self {
            id,
            name,
            location,
            capacity,
        })
    }

    pub fn id_typed(&self) -> &WarehouseId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: RegisterWarehouse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWarehouse {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
}

impl RegisterWarehouse {
    /// Validate the command and produce the warehouse to insert under a fresh id.
    pub fn into_warehouse(self) -> DomainResult<Warehouse> {
        let name = present(self.name);
        let location = present(self.location);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if location.is_none() {
            missing.push("location");
        }
        if self.capacity.is_none() {
            missing.push("capacity");
        }
        if let Some(err) = DomainError::missing_fields(&missing) {
            return Err(err);
        }

        Warehouse::new(
            WarehouseId::generate(),
            name.unwrap_or_default(),
            location.unwrap_or_default(),
            self.capacity.unwrap_or_default(),
        )
    }
}
