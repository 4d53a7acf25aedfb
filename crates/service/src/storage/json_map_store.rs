use std::{collections::BTreeMap, path::PathBuf, sync::Arc};
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};

use crate::errors::ServiceError;

fn io_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

/// Generic JSON file-backed key-value map store.
///
/// Persists a `BTreeMap<String, V>` to a JSON file. Every mutation rewrites the
/// whole file through a temporary sibling followed by a rename.
pub struct JsonMapStore<V> {
    inner: RwLock<BTreeMap<String, V>>,
    write_lock: Mutex<()>,
    file_path: PathBuf,
}

impl<V> JsonMapStore<V>
where
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    /// Load the store from `path`. A missing file starts empty; an unreadable one is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let map: BTreeMap<String, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_err(e)),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), write_lock: Mutex::new(()), file_path }))
    }

    async fn persist(&self, map: &BTreeMap<String, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(io_err)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(io_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(io_err)?;
        Ok(())
    }

    /// Snapshot of all values, in key order.
    pub async fn values(&self) -> Vec<V> {
        self.inner.read().await.values().cloned().collect()
    }

    /// Snapshot of the whole map.
    pub async fn snapshot(&self) -> BTreeMap<String, V> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: String, value: V) -> Result<(), ServiceError> {
        self.update_map(|m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        self.update_map(|m| Ok(m.remove(key).is_some())).await
    }

    /// Apply a mutation to a copy of the map, persist the copy, then swap it in.
    /// A failing closure or a failed write leaves both memory and file untouched.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<String, V>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut next = self.inner.read().await.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *self.inner.write().await = next;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String>::open(&tmp).await?;

        assert_eq!(store.len().await, 0);

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.get("a").await.as_deref(), Some("1"));

        let old = store
            .update_map(|m| Ok(m.insert("a".to_string(), "10".into())))
            .await?;
        assert_eq!(old.as_deref(), Some("1"));

        assert!(store.remove("b").await?);
        assert!(!store.remove("b").await?);

        let reloaded = JsonMapStore::<String>::open(&tmp).await?;
        assert_eq!(reloaded.values().await, vec!["10".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        assert!(matches!(JsonMapStore::<String>::open(&tmp).await, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String>::open(&tmp).await?;
        store.insert("a".into(), "1".into()).await?;
        let res: Result<(), _> = store
            .update_map(|_| Err(ServiceError::Storage("boom".into())))
            .await;
        assert!(res.is_err());
        let reloaded = JsonMapStore::<String>::open(&tmp).await?;
        assert_eq!(reloaded.get("a").await.as_deref(), Some("1"));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_unchanged() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_map_store_{}", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String>::open(dir.join("map.json")).await?;
        store.insert("a".into(), "1".into()).await?;

        tokio::fs::remove_dir_all(&dir).await?;
        assert!(matches!(store.insert("b".into(), "2".into()).await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.remove("a").await, Err(ServiceError::Storage(_))));

        assert_eq!(store.get("b").await, None);
        assert_eq!(store.values().await, vec!["1".to_string()]);
        Ok(())
    }
}
