//! Infrastructure layer: storage backends, the catalog/inventory/statistics
//! services built on them, and configuration.

pub mod catalog_manager;
pub mod config;
pub mod error;
pub mod inventory_ledger;
pub mod statistics;
pub mod store;


pub use catalog_manager::{CatalogManager, WarehouseRemoval};
pub use error::{ServiceError, ServiceResult};
pub use inventory_ledger::InventoryLedger;
pub use statistics::{CapacityStatistics, StatisticsEngine, WarehouseValue};
