use std::sync::Arc;

use models::{Cat, CatPatch};
use tracing::{debug, instrument};

use crate::cats::repository::{CatRepository, InMemoryCatRepository};
use crate::errors::ServiceError;

/// Application service for cats, shared by the REST handlers and the GraphQL
/// resolvers. Owns its repository for the lifetime of the process.
pub struct CatsService {
    repo: Arc<dyn CatRepository>,
}

impl CatsService {
    pub fn new(repo: Arc<dyn CatRepository>) -> Self { Self { repo } }

    pub fn in_memory() -> Self { Self::new(Arc::new(InMemoryCatRepository::new())) }

    /// Append unconditionally; no duplicate-id check.
    #[instrument(skip(self, cat), fields(id = cat.id))]
    pub async fn create(&self, cat: Cat) -> Result<Cat, ServiceError> {
        let stored = self.repo.insert(cat).await?;
        debug!("cat created");
        Ok(stored)
    }

    /// Snapshot of all cats in insertion order. Later mutations are not
    /// reflected in a returned list.
    pub async fn find_all(&self) -> Result<Vec<Cat>, ServiceError> {
        self.repo.all().await
    }

    pub async fn find_one(&self, id: i32) -> Result<Option<Cat>, ServiceError> {
        self.repo.first_by_id(id).await
    }

    /// Merge into the first matching cat; does nothing when `id` is unknown.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: &CatPatch) -> Result<(), ServiceError> {
        if self.repo.update_first(id, patch).await?.is_none() {
            debug!("update skipped, no such cat");
        }
        Ok(())
    }

    /// Merge into the first matching cat and return the merged record, or
    /// `None` when `id` is unknown.
    #[instrument(skip(self, patch))]
    pub async fn update_and_fetch(&self, id: i32, patch: &CatPatch) -> Result<Option<Cat>, ServiceError> {
        self.repo.update_first(id, patch).await
    }

    /// Remove the first matching cat; no-op when `id` is unknown.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        if self.repo.remove_first(id).await?.is_none() {
            debug!("remove skipped, no such cat");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tom() -> Cat {
        Cat { id: 1, name: "Tom".into(), age: 3, breed: "Siamese".into() }
    }

    #[tokio::test]
    async fn create_then_list_returns_the_cat() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        assert_eq!(svc.create(tom()).await?, tom());
        assert_eq!(svc.find_all().await?, vec![tom()]);
        Ok(())
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        let felix = Cat { id: 2, name: "Felix".into(), ..tom() };
        svc.create(felix.clone()).await?;
        svc.create(tom()).await?;
        assert_eq!(svc.find_all().await?, vec![felix, tom()]);
        Ok(())
    }

    #[tokio::test]
    async fn listed_snapshot_does_not_track_later_writes() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        let snapshot = svc.find_all().await?;
        svc.remove(1).await?;
        assert_eq!(snapshot, vec![tom()]);
        assert!(svc.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn find_one_matches_by_id() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        assert_eq!(svc.find_one(1).await?, Some(tom()));
        assert_eq!(svc.find_one(2).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        svc.update(1, &CatPatch { age: Some(4), ..Default::default() }).await?;
        assert_eq!(svc.find_one(1).await?, Some(Cat { age: 4, ..tom() }));
        Ok(())
    }

    #[tokio::test]
    async fn update_on_missing_id_is_a_no_op() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        svc.update(7, &CatPatch { age: Some(9), ..Default::default() }).await?;
        assert_eq!(svc.find_all().await?, vec![tom()]);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_fetch_returns_merged_or_none() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        let patch = CatPatch { name: Some("Tommy".into()), ..Default::default() };
        assert_eq!(
            svc.update_and_fetch(1, &patch).await?,
            Some(Cat { name: "Tommy".into(), ..tom() })
        );
        assert_eq!(svc.update_and_fetch(7, &patch).await?, None);
        assert_eq!(svc.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn remove_shrinks_by_one_and_ignores_missing() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        svc.remove(5).await?;
        assert_eq!(svc.find_all().await?.len(), 1);
        svc.remove(1).await?;
        assert!(svc.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn tom_lifecycle() -> Result<(), anyhow::Error> {
        let svc = CatsService::in_memory();
        svc.create(tom()).await?;
        assert_eq!(svc.find_all().await?, vec![tom()]);
        svc.update(1, &CatPatch { age: Some(4), ..Default::default() }).await?;
        let updated = svc.find_one(1).await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!((updated.age, updated.name.as_str(), updated.breed.as_str()), (4, "Tom", "Siamese"));
        svc.remove(1).await?;
        assert!(svc.find_all().await?.is_empty());
        Ok(())
    }
}
