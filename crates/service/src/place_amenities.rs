//! Links between places and amenities.

use std::sync::Arc;

use models::{EntityKind, Record};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{controller::to_dicts, errors::ServiceError, storage::Storage};

/// Outcome of linking an amenity to a place.
#[derive(Debug, Clone, PartialEq)]
pub enum Linked {
    Created(Value),
    Existing(Value),
}

#[derive(Clone)]
pub struct PlaceAmenities {
    store: Arc<dyn Storage>,
}

impl PlaceAmenities {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Record, ServiceError> {
        self.store.get(kind, id).await?.ok_or_else(|| ServiceError::not_found(kind, id))
    }

    /// Amenities linked to a place. Dangling links are skipped.
    pub async fn list(&self, place_id: &str) -> Result<Vec<Value>, ServiceError> {
        self.fetch(EntityKind::Place, place_id).await?;
        let mut amenities = Vec::new();
        for amenity_id in self.store.amenity_ids(place_id).await? {
            if let Some(a) = self.store.get(EntityKind::Amenity, &amenity_id).await? {
                amenities.push(a);
            }
        }
        to_dicts(amenities)
    }

    #[instrument(skip(self))]
    pub async fn link(&self, place_id: &str, amenity_id: &str) -> Result<Linked, ServiceError> {
        self.fetch(EntityKind::Place, place_id).await?;
        let amenity = self.fetch(EntityKind::Amenity, amenity_id).await?.to_dict()?;
        if self.store.link_amenity(place_id, amenity_id).await? {
            info!("amenity linked");
            Ok(Linked::Created(amenity))
        } else {
            Ok(Linked::Existing(amenity))
        }
    }

    #[instrument(skip(self))]
    pub async fn unlink(&self, place_id: &str, amenity_id: &str) -> Result<(), ServiceError> {
        self.fetch(EntityKind::Place, place_id).await?;
        self.fetch(EntityKind::Amenity, amenity_id).await?;
        if !self.store.unlink_amenity(place_id, amenity_id).await? {
            return Err(ServiceError::not_found(EntityKind::Amenity, amenity_id));
        }
        info!("amenity unlinked");
        Ok(())
    }
}
