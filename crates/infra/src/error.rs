//! Service-level error: what the managers return to the HTTP layer.

use thiserror::Error;

use stockyard_core::DomainError;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation, not-found and conflict outcomes.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(resource: &str) -> Self {
        Self::Domain(DomainError::not_found(resource))
    }
}
