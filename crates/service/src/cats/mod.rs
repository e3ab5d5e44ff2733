pub mod repository;
pub mod service;

use std::sync::Arc;

use configs::{StorageConfig, StoreBackend};
use tracing::info;

use crate::errors::ServiceError;
use repository::{CatRepository, InMemoryCatRepository, JsonFileCatRepository};
use service::CatsService;

/// Build the cats service over the backend selected in configuration.
pub async fn from_config(storage: &StorageConfig) -> Result<CatsService, ServiceError> {
    let repo: Arc<dyn CatRepository> = match (storage.backend, storage.path.as_deref()) {
        (StoreBackend::Json, Some(path)) => {
            info!(%path, "cats stored in json file");
            Arc::new(JsonFileCatRepository::new(path).await?)
        }
        (StoreBackend::Json, None) => {
            return Err(ServiceError::Validation("storage.path is required for the json backend".into()))
        }
        (StoreBackend::Memory, _) => Arc::new(InMemoryCatRepository::new()),
    };
    Ok(CatsService::new(repo))
}
