use std::{path::PathBuf, sync::Arc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered list.
///
/// Keeps a `Vec<T>` in memory and rewrites the whole file after every
/// mutation. Order of insertion is preserved on disk.
#[derive(Clone)]
pub struct JsonVecStore<T> {
    inner: Arc<RwLock<Vec<T>>>,
    file_path: PathBuf,
}

fn storage_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

impl<T> JsonVecStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the list from `path`, creating the file with `[]` if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let items: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(storage_err)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(storage_err)?;
                Vec::new()
            }
            Err(e) => return Err(storage_err(e)),
        };

        Ok(Self { inner: Arc::new(RwLock::new(items)), file_path })
    }

    async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(storage_err)?;
        fs::write(&self.file_path, data).await.map_err(storage_err)
    }

    /// Snapshot of all items in order.
    pub async fn list(&self) -> Vec<T> {
        self.inner.read().await.clone()
    }

    /// Run a read-only query against the items.
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let items = self.inner.read().await;
        f(&items)
    }

    /// Apply a mutation and persist while still holding the write lock.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> Result<R, ServiceError> {
        let mut items = self.inner.write().await;
        let out = f(&mut items);
        self.save(&items).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_vec_store_persists_in_order() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_vec_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonVecStore::<String>::new(&tmp).await?;

        // initially empty
        assert!(store.list().await.is_empty());

        store.update(|v| v.push("a".into())).await?;
        store.update(|v| v.push("b".into())).await?;
        store.update(|v| v.push("c".into())).await?;
        assert_eq!(store.read(|v| v.len()).await, 3);

        let removed = store.update(|v| v.remove(1)).await?;
        assert_eq!(removed, "b");

        let reloaded = JsonVecStore::<String>::new(&tmp).await?;
        assert_eq!(reloaded.list().await, vec!["a".to_string(), "c".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_vec_store_bad_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonVecStore::<String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
