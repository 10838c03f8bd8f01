//! Catalog domain module: products and warehouses.
//!
//! This crate contains the registration rules for catalog records, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod warehouse;

pub use product::{Product, ProductFilter, ProductId, RegisterProduct};
pub use warehouse::{RegisterWarehouse, Warehouse, WarehouseId};

