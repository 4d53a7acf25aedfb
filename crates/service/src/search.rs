//! Places search across state and amenity filters.

use std::{collections::HashSet, sync::Arc};

use models::{EntityKind, Record};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{controller::to_dicts, errors::ServiceError, payload::Payload, storage::Storage};

/// Filter lists of a search request. An absent or `null` list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub amenities: Vec<String>,
}

impl SearchFilters {
    /// An empty body means "no filters"; anything else must be a JSON object.
    pub fn parse(body: &[u8]) -> Result<Self, ServiceError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let payload = Payload::parse(body)?;
        Ok(Self {
            states: id_list(&payload, "states"),
            cities: id_list(&payload, "cities"),
            amenities: id_list(&payload, "amenities"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty() && self.amenities.is_empty()
    }
}

/// Ids of one filter. Non-string entries keep their JSON text and so never
/// resolve; a bare string counts as a one-id list; other values are no filter.
fn id_list(payload: &Payload, field: &str) -> Vec<String> {
    match payload.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect(),
        Some(Value::String(id)) if !id.is_empty() => vec![id.clone()],
        _ => Vec::new(),
    }
}

pub struct PlaceSearch {
    store: Arc<dyn Storage>,
}

impl PlaceSearch {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Run a search from a raw request body.
    pub async fn search_body(&self, body: &[u8]) -> Result<Vec<Value>, ServiceError> {
        let filters = SearchFilters::parse(body)?;
        self.search(&filters).await
    }

    /// Places of the listed states (every place when no list is given),
    /// narrowed to those carrying all listed amenities. `cities` only counts
    /// toward deciding whether any filter was supplied. Duplicates are kept.
    #[instrument(skip(self))]
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Value>, ServiceError> {
        if filters.is_empty() {
            return to_dicts(self.store.all(EntityKind::Place).await?.into_values());
        }

        let mut candidates: Vec<Record> = Vec::new();
        for state_id in &filters.states {
            if self.store.get(EntityKind::State, state_id).await?.is_none() {
                continue;
            }
            for city in self.store.children(EntityKind::City, state_id).await? {
                candidates.extend(self.store.children(EntityKind::Place, city.id()).await?);
            }
        }

        if !filters.amenities.is_empty() {
            if candidates.is_empty() {
                candidates = self.store.all(EntityKind::Place).await?.into_values().collect();
            }
            let mut wanted = HashSet::new();
            for amenity_id in &filters.amenities {
                if self.store.get(EntityKind::Amenity, amenity_id).await?.is_none() {
                    debug!(amenity_id = %amenity_id, "unknown amenity, no place can match");
                    return Ok(Vec::new());
                }
                wanted.insert(amenity_id.as_str());
            }
            let mut kept = Vec::with_capacity(candidates.len());
            for place in candidates {
                let linked = self.store.amenity_ids(place.id()).await?;
                let linked: HashSet<&str> = linked.iter().map(String::as_str).collect();
                if wanted.is_subset(&linked) {
                    kept.push(place);
                }
            }
            candidates = kept;
        }

        debug!(matches = candidates.len(), "places search done");
        to_dicts(candidates)
    }
}
