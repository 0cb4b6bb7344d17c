//! Serving side of hotelsync: where canonical hotels are kept and how they
//! are queried.

pub mod api;
pub mod config;
pub mod memory;
pub mod metrics_defs;
pub mod redis_store;

use config::StoreConfig;
use ingest::repository::{HotelRepository, StoreError};
use std::sync::Arc;

/// Builds the repository selected by the configuration.
pub async fn get_repository(config: &StoreConfig) -> Result<Arc<dyn HotelRepository>, StoreError> {
    match &config.r#type {
        config::StoreType::Memory => {
            tracing::warn!("Using the in-memory hotel store, data will not survive a restart");
            Ok(Arc::new(memory::MemoryStore::new(config.ttl)))
        }
        config::StoreType::Redis { url } => {
            let store = redis_store::RedisStore::connect(url, config.ttl).await?;
            Ok(Arc::new(store))
        }
    }
}
