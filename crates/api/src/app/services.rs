//! Service wiring: pick a storage backend and build the managers over it.

use std::sync::Arc;

use stockyard_infra::config::{AppConfig, StorageBackend};
use stockyard_infra::store::{InMemoryStore, PostgresStore, Storage, StoreError};
use stockyard_infra::{CatalogManager, InventoryLedger, ServiceResult, StatisticsEngine};

/// Everything the handlers need, shared behind one `Arc` extension.
pub struct AppServices {
    storage: Arc<dyn Storage>,
    pub catalog: CatalogManager<dyn Storage>,
    pub ledger: InventoryLedger<dyn Storage>,
    pub statistics: StatisticsEngine<dyn Storage>,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            catalog: CatalogManager::new(storage.clone()),
            ledger: InventoryLedger::new(storage.clone()),
            statistics: StatisticsEngine::new(storage.clone()),
            storage,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Remove every record from every collection.
    pub async fn cleanup(&self) -> ServiceResult<()> {
        self.storage.clear_all().await?;
        tracing::info!("all collections cleared");
        Ok(())
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    match &config.storage {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StorageBackend::Postgres { database_url } => {
            tracing::info!("using postgres stores");
            let store = PostgresStore::connect(database_url).await?;
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
