use std::sync::Arc;
use tasktrack_adapter_pg::PostgresStore;
use tasktrack_core::{MemoryStore, StoreBackend, TrackerConfig, TrackerService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: TrackerService,
    pub config: Arc<TrackerConfig>,
}

impl AppState {
    pub fn new(service: TrackerService, config: TrackerConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }

    /// Open the configured store, bootstrap its schema and build the service.
    pub async fn init(config: &TrackerConfig) -> anyhow::Result<Self> {
        let service = match config.database.backend {
            StoreBackend::Postgres => {
                let store = PostgresStore::connect(&config.database).await?;
                store.bootstrap_schema().await?;
                TrackerService::from_store(Arc::new(store))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data will not survive a restart");
                TrackerService::from_store(Arc::new(MemoryStore::new()))
            }
        };
        Ok(Self::new(service, config.clone()))
    }
}
