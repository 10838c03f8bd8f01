//! Inventory domain module.
//!
//! This crate contains the rules for warehouse inventory line items, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{AddInventoryItem, InventoryItem, InventoryItemId};
