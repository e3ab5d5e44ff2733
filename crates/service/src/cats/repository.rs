use async_trait::async_trait;
use models::{Cat, CatPatch};
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::storage::json_vec_store::JsonVecStore;

/// Backing store for cats. Implementations keep insertion order and resolve
/// ids by first match, so duplicate ids stay observable.
#[async_trait]
pub trait CatRepository: Send + Sync {
    async fn insert(&self, cat: Cat) -> Result<Cat, ServiceError>;
    async fn all(&self) -> Result<Vec<Cat>, ServiceError>;
    async fn first_by_id(&self, id: i32) -> Result<Option<Cat>, ServiceError>;
    /// Merge `patch` into the first cat with `id`; `None` when there is none.
    async fn update_first(&self, id: i32, patch: &CatPatch) -> Result<Option<Cat>, ServiceError>;
    /// Remove the first cat with `id`, returning it.
    async fn remove_first(&self, id: i32) -> Result<Option<Cat>, ServiceError>;
}

fn update_in(cats: &mut [Cat], id: i32, patch: &CatPatch) -> Option<Cat> {
    let cat = cats.iter_mut().find(|c| c.id == id)?;
    patch.apply(cat);
    Some(cat.clone())
}

fn remove_in(cats: &mut Vec<Cat>, id: i32) -> Option<Cat> {
    let idx = cats.iter().position(|c| c.id == id)?;
    Some(cats.remove(idx))
}

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryCatRepository {
    cats: RwLock<Vec<Cat>>,
}

impl InMemoryCatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatRepository for InMemoryCatRepository {
    async fn insert(&self, cat: Cat) -> Result<Cat, ServiceError> {
        self.cats.write().await.push(cat.clone());
        Ok(cat)
    }

    async fn all(&self) -> Result<Vec<Cat>, ServiceError> {
        Ok(self.cats.read().await.clone())
    }

    async fn first_by_id(&self, id: i32) -> Result<Option<Cat>, ServiceError> {
        Ok(self.cats.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn update_first(&self, id: i32, patch: &CatPatch) -> Result<Option<Cat>, ServiceError> {
        Ok(update_in(&mut self.cats.write().await, id, patch))
    }

    async fn remove_first(&self, id: i32) -> Result<Option<Cat>, ServiceError> {
        Ok(remove_in(&mut *self.cats.write().await, id))
    }
}

/// Cats persisted as a JSON array file.
#[derive(Clone)]
pub struct JsonFileCatRepository {
    store: JsonVecStore<Cat>,
}

impl JsonFileCatRepository {
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Self, ServiceError> {
        Ok(Self { store: JsonVecStore::new(path).await? })
    }
}

#[async_trait]
impl CatRepository for JsonFileCatRepository {
    async fn insert(&self, cat: Cat) -> Result<Cat, ServiceError> {
        let stored = cat.clone();
        self.store.update(move |cats| cats.push(cat)).await?;
        Ok(stored)
    }

    async fn all(&self) -> Result<Vec<Cat>, ServiceError> {
        Ok(self.store.list().await)
    }

    async fn first_by_id(&self, id: i32) -> Result<Option<Cat>, ServiceError> {
        Ok(self.store.read(|cats| cats.iter().find(|c| c.id == id).cloned()).await)
    }

    async fn update_first(&self, id: i32, patch: &CatPatch) -> Result<Option<Cat>, ServiceError> {
        self.store.update(|cats| update_in(cats, id, patch)).await
    }

    async fn remove_first(&self, id: i32) -> Result<Option<Cat>, ServiceError> {
        self.store.update(|cats| remove_in(cats, id)).await
    }
}
