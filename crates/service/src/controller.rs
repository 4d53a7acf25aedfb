//! Generic CRUD over any [`Resource`] kind.

use std::{marker::PhantomData, sync::Arc};

use models::{timestamp, EntityKind, Record};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, payload::Payload, resource::Resource, storage::Storage};

/// Serialize records through their public dictionary form.
pub fn to_dicts(records: impl IntoIterator<Item = Record>) -> Result<Vec<Value>, ServiceError> {
    records.into_iter().map(|r| r.to_dict().map_err(ServiceError::from)).collect()
}

pub struct ResourceService<T> {
    store: Arc<dyn Storage>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceService<T> {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store, _kind: PhantomData }
    }

    async fn fetch(&self, id: &str) -> Result<T, ServiceError> {
        let record = self.store.get(T::KIND, id).await?.ok_or_else(|| ServiceError::not_found(T::KIND, id))?;
        T::try_from(record).map_err(|other| ServiceError::Storage(format!("{} stored under {}", other.kind(), T::KIND)))
    }

    async fn require_exists(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError> {
        match self.store.get(kind, id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(kind, id)),
        }
    }

    /// Every object of this kind.
    pub async fn list(&self) -> Result<Vec<Value>, ServiceError> {
        let all = self.store.all(T::KIND).await?;
        to_dicts(all.into_values())
    }

    pub async fn get(&self, id: &str) -> Result<Value, ServiceError> {
        let record: Record = self.fetch(id).await?.into();
        Ok(record.to_dict()?)
    }

    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.store.delete(T::KIND, id).await? {
            return Err(ServiceError::not_found(T::KIND, id));
        }
        info!(id, "deleted");
        Ok(())
    }

    /// Children of `parent_id` for nested kinds; 404 when the parent is unknown.
    pub async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<Value>, ServiceError> {
        let Some(link) = T::KIND.parent() else {
            return self.list().await;
        };
        self.require_exists(link.kind, parent_id).await?;
        to_dicts(self.store.children(T::KIND, parent_id).await?)
    }

    /// Create from a raw body. Checks run in a fixed order: parent existence,
    /// body shape, required fields, owning user.
    #[instrument(skip(self, body), fields(kind = %T::KIND))]
    pub async fn create(&self, parent_id: Option<&str>, body: &[u8]) -> Result<Value, ServiceError> {
        let link = T::KIND.parent();
        if let (Some(link), Some(pid)) = (link, parent_id) {
            self.require_exists(link.kind, pid).await?;
        }
        let mut payload = Payload::parse(body)?;
        payload.require(T::REQUIRED)?;
        if let Some(owner) = T::OWNER {
            // only a string can name a stored user
            let user_id = match payload.get(owner) {
                Some(Value::String(id)) => id.clone(),
                other => return Err(ServiceError::not_found(EntityKind::User, &other.map(Value::to_string).unwrap_or_default())),
            };
            self.require_exists(EntityKind::User, &user_id).await?;
        }
        if let Some(link) = link {
            let pid = parent_id.ok_or(ServiceError::MissingField(link.field))?;
            payload.insert(link.field, pid);
        }

        let now = timestamp::now();
        let mut obj = T::build(Uuid::new_v4().to_string(), now, &payload)?;
        for (field, value) in payload.entries_except(T::REQUIRED) {
            if !T::IMMUTABLE.contains(&field) {
                obj.assign(field, value)?;
            }
        }

        let record: Record = obj.into();
        self.store.save(record.clone()).await?;
        info!(id = record.id(), "created");
        Ok(record.to_dict()?)
    }

    /// Partial update: every mutable key in the body overwrites its attribute,
    /// immutable and unknown keys are skipped, `updated_at` always advances.
    #[instrument(skip(self, body), fields(kind = %T::KIND))]
    pub async fn update(&self, id: &str, body: &[u8]) -> Result<Value, ServiceError> {
        let mut obj = self.fetch(id).await?;
        let payload = Payload::parse(body)?;
        for (field, value) in payload.entries_except(T::IMMUTABLE) {
            obj.assign(field, value)?;
        }
        obj.touch(timestamp::now());

        let record: Record = obj.into();
        self.store.save(record.clone()).await?;
        info!(id, "updated");
        Ok(record.to_dict()?)
    }
}

impl<T> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), _kind: PhantomData }
    }
}

#[cfg(test)]
mod tests;
