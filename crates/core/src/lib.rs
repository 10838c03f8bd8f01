//! `stockyard-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and the `Entity` trait.

pub mod entity;
pub mod error;
pub mod field;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::Id;
