use std::sync::Arc;

use common::types::Stats;
use models::EntityKind;

use crate::{errors::ServiceError, storage::Storage};

/// Object counts per kind.
pub async fn collect(store: &Arc<dyn Storage>) -> Result<Stats, ServiceError> {
    Ok(Stats {
        amenities: store.count(EntityKind::Amenity).await?,
        cities: store.count(EntityKind::City).await?,
        places: store.count(EntityKind::Place).await?,
        reviews: store.count(EntityKind::Review).await?,
        states: store.count(EntityKind::State).await?,
        users: store.count(EntityKind::User).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, both_backends, put};

    #[tokio::test]
    async fn counts_per_kind() -> Result<(), anyhow::Error> {
        both_backends!(|store| {
            let s = put(&store, test_support::state("S")).await?;
            put(&store, test_support::city(&s.id, "C1")).await?;
            put(&store, test_support::city(&s.id, "C2")).await?;
            put(&store, test_support::amenity("Wifi")).await?;
            let stats = collect(&store).await?;
            assert_eq!(stats.states, 1);
            assert_eq!(stats.cities, 2);
            assert_eq!(stats.amenities, 1);
            assert_eq!(stats.places + stats.reviews + stats.users, 0);
        });
        Ok(())
    }
}
