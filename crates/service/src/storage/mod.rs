//! Persistence collaborator for the resource services.
//!
//! Controllers only ever talk to [`Storage`]; the concrete backend is picked at
//! startup from configuration and shared as an `Arc<dyn Storage>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{EntityKind, Record};

use crate::errors::ServiceError;

pub mod db;
pub mod file;
pub mod json_map_store;

pub use db::DbStorage;
pub use file::FileStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>, ServiceError>;

    /// Every stored object of `kind`, keyed by id.
    async fn all(&self, kind: EntityKind) -> Result<BTreeMap<String, Record>, ServiceError>;

    async fn count(&self, kind: EntityKind) -> Result<u64, ServiceError>;

    /// Insert or replace, persisted before returning.
    async fn save(&self, record: Record) -> Result<(), ServiceError>;

    /// Remove one object and any amenity links it takes part in. Returns whether it existed.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<bool, ServiceError>;

    /// Objects of `kind` whose parent reference equals `parent_id`, oldest first.
    async fn children(&self, kind: EntityKind, parent_id: &str) -> Result<Vec<Record>, ServiceError>;

    async fn amenity_ids(&self, place_id: &str) -> Result<Vec<String>, ServiceError>;

    /// Returns `false` when the link already existed.
    async fn link_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError>;

    /// Returns `false` when there was nothing to unlink.
    async fn unlink_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError>;

    async fn close(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Sort by creation time, ties broken by id, so listings are stable across backends.
pub(crate) fn sort_by_creation(records: &mut [Record]) {
    records.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(b.id())));
}

#[cfg(test)]
mod tests;
