//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lookups, uniqueness). Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request was missing a required field or carried an invalid value.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A lookup by identifier yielded no record. Carries the resource kind.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g. duplicate product id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Build a validation error listing the missing fields, or `None` when
    /// nothing is missing.
    pub fn missing_fields(fields: &[&str]) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        Some(Self::Validation(format!(
            "missing required field(s): {}",
            fields.join(", ")
        )))
    }
}
