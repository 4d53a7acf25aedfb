//! JSON file backend: every object in `file.json` under `"<Class>.<id>"`,
//! amenity links in `place_amenity.json` keyed by place id.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    sync::Arc,
};

use async_trait::async_trait;
use models::{record::storage_key, EntityKind, Record};
use tracing::{debug, info, warn};

use super::{json_map_store::JsonMapStore, sort_by_creation, Storage};
use crate::errors::ServiceError;

pub const OBJECTS_FILE: &str = "file.json";
pub const LINKS_FILE: &str = "place_amenity.json";

pub struct FileStorage {
    objects: Arc<JsonMapStore<Record>>,
    links: Arc<JsonMapStore<Vec<String>>>,
}

impl FileStorage {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let dir = data_dir.as_ref();
        let objects = JsonMapStore::open(dir.join(OBJECTS_FILE)).await?;
        let links = JsonMapStore::open(dir.join(LINKS_FILE)).await?;
        let object_count = objects.len().await;
        info!(data_dir = %dir.display(), objects = object_count, "file storage opened");
        let store = Self { objects, links };
        store.prune_links().await?;
        Ok(store)
    }

    /// Drop link entries whose place or amenity no longer exists, left behind
    /// when a delete removed the object but failed to rewrite the links file.
    async fn prune_links(&self) -> Result<(), ServiceError> {
        let mut places = BTreeSet::new();
        let mut amenities = BTreeSet::new();
        for record in self.objects.values().await {
            match record.kind() {
                EntityKind::Place => places.insert(record.id().to_string()),
                EntityKind::Amenity => amenities.insert(record.id().to_string()),
                _ => false,
            };
        }
        let live = |place_id: &str, ids: &[String]| {
            places.contains(place_id) && ids.iter().all(|a| amenities.contains(a))
        };
        let dangling = self
            .links
            .snapshot()
            .await
            .iter()
            .any(|(place_id, ids)| !live(place_id, ids));
        if !dangling {
            return Ok(());
        }
        let pruned = self
            .links
            .update_map(|m| {
                let before: usize = m.values().map(Vec::len).sum();
                m.retain(|place_id, _| places.contains(place_id));
                for ids in m.values_mut() {
                    ids.retain(|a| amenities.contains(a));
                }
                m.retain(|_, ids| !ids.is_empty());
                Ok(before - m.values().map(Vec::len).sum::<usize>())
            })
            .await?;
        warn!(pruned, "dropped dangling amenity links");
        Ok(())
    }

    async fn of_kind(&self, kind: EntityKind) -> Vec<Record> {
        self.objects.values().await.into_iter().filter(|r| r.kind() == kind).collect()
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>, ServiceError> {
        Ok(self.objects.get(&storage_key(kind, id)).await)
    }

    async fn all(&self, kind: EntityKind) -> Result<BTreeMap<String, Record>, ServiceError> {
        Ok(self
            .of_kind(kind)
            .await
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect())
    }

    async fn count(&self, kind: EntityKind) -> Result<u64, ServiceError> {
        Ok(self.of_kind(kind).await.len() as u64)
    }

    async fn save(&self, record: Record) -> Result<(), ServiceError> {
        debug!(key = %record.storage_key(), "file storage save");
        self.objects.insert(record.storage_key(), record).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<bool, ServiceError> {
        let existed = self.objects.remove(&storage_key(kind, id)).await?;
        if !existed {
            return Ok(false);
        }
        match kind {
            EntityKind::Place => {
                self.links.remove(id).await?;
            }
            EntityKind::Amenity => {
                self.links
                    .update_map(|m| {
                        for ids in m.values_mut() {
                            ids.retain(|a| a != id);
                        }
                        m.retain(|_, ids| !ids.is_empty());
                        Ok(())
                    })
                    .await?;
            }
            _ => {}
        }
        Ok(true)
    }

    async fn children(&self, kind: EntityKind, parent_id: &str) -> Result<Vec<Record>, ServiceError> {
        let mut out: Vec<Record> = self
            .of_kind(kind)
            .await
            .into_iter()
            .filter(|r| r.parent_id() == Some(parent_id))
            .collect();
        sort_by_creation(&mut out);
        Ok(out)
    }

    async fn amenity_ids(&self, place_id: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.links.get(place_id).await.unwrap_or_default())
    }

    async fn link_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError> {
        self.links
            .update_map(|m| {
                let ids = m.entry(place_id.to_string()).or_default();
                if ids.iter().any(|a| a == amenity_id) {
                    return Ok(false);
                }
                ids.push(amenity_id.to_string());
                Ok(true)
            })
            .await
    }

    async fn unlink_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError> {
        self.links
            .update_map(|m| {
                let Some(ids) = m.get_mut(place_id) else {
                    return Ok(false);
                };
                let before = ids.len();
                ids.retain(|a| a != amenity_id);
                let removed = ids.len() != before;
                if ids.is_empty() {
                    m.remove(place_id);
                }
                Ok(removed)
            })
            .await
    }
}
