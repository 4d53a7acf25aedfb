//! SeaORM backend over PostgreSQL or SQLite.

use std::collections::BTreeMap;

use async_trait::async_trait;
use configs::DatabaseConfig;
use models::{amenity, city, place, place_amenity, review, state, user, EntityKind, Record};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::Storage;
use crate::errors::ServiceError;

/// Binds `$entity` to the SeaORM entity of `$kind` and evaluates `$body` once per kind.
macro_rules! for_kind {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            EntityKind::Amenity => {
                type $entity = amenity::Entity;
                $body
            }
            EntityKind::City => {
                type $entity = city::Entity;
                $body
            }
            EntityKind::Place => {
                type $entity = place::Entity;
                $body
            }
            EntityKind::Review => {
                type $entity = review::Entity;
                $body
            }
            EntityKind::State => {
                type $entity = state::Entity;
                $body
            }
            EntityKind::User => {
                type $entity = user::Entity;
                $body
            }
        }
    };
}

#[derive(Clone)]
pub struct DbStorage {
    db: DatabaseConnection,
}

impl DbStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a pool from configuration and apply pending migrations.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = models::db::connect_and_migrate(cfg).await?;
        info!(sqlite = cfg.is_sqlite(), "database storage ready");
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Update the row when `id` is already stored, insert it otherwise.
async fn upsert<E>(db: &DatabaseConnection, id: &str, model: E::Model) -> Result<(), ServiceError>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
{
    let exists = E::find_by_id(id.to_string()).one(db).await?.is_some();
    let am = model.into_active_model().reset_all();
    if exists {
        am.update(db).await?;
    } else {
        am.insert(db).await?;
    }
    Ok(())
}

#[async_trait]
impl Storage for DbStorage {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>, ServiceError> {
        let found = for_kind!(kind, E => E::find_by_id(id.to_string()).one(&self.db).await?.map(Record::from));
        Ok(found)
    }

    async fn all(&self, kind: EntityKind) -> Result<BTreeMap<String, Record>, ServiceError> {
        let rows: Vec<Record> =
            for_kind!(kind, E => E::find().all(&self.db).await?.into_iter().map(Record::from).collect());
        Ok(rows.into_iter().map(|r| (r.id().to_string(), r)).collect())
    }

    async fn count(&self, kind: EntityKind) -> Result<u64, ServiceError> {
        let n = for_kind!(kind, E => E::find().count(&self.db).await?);
        Ok(n)
    }

    async fn save(&self, record: Record) -> Result<(), ServiceError> {
        debug!(key = %record.storage_key(), "db storage save");
        let id = record.id().to_string();
        match record {
            Record::Amenity(m) => upsert::<amenity::Entity>(&self.db, &id, m).await,
            Record::City(m) => upsert::<city::Entity>(&self.db, &id, m).await,
            Record::Place(m) => upsert::<place::Entity>(&self.db, &id, m).await,
            Record::Review(m) => upsert::<review::Entity>(&self.db, &id, m).await,
            Record::State(m) => upsert::<state::Entity>(&self.db, &id, m).await,
            Record::User(m) => upsert::<user::Entity>(&self.db, &id, m).await,
        }
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        match kind {
            EntityKind::Place => {
                place_amenity::Entity::delete_many()
                    .filter(place_amenity::Column::PlaceId.eq(id))
                    .exec(&txn)
                    .await?;
            }
            EntityKind::Amenity => {
                place_amenity::Entity::delete_many()
                    .filter(place_amenity::Column::AmenityId.eq(id))
                    .exec(&txn)
                    .await?;
            }
            _ => {}
        }
        let affected = for_kind!(kind, E => E::delete_by_id(id.to_string()).exec(&txn).await?.rows_affected);
        txn.commit().await?;
        Ok(affected > 0)
    }

    async fn children(&self, kind: EntityKind, parent_id: &str) -> Result<Vec<Record>, ServiceError> {
        let rows = match kind {
            EntityKind::City => city::Entity::find()
                .filter(city::Column::StateId.eq(parent_id))
                .order_by_asc(city::Column::CreatedAt)
                .order_by_asc(city::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect(),
            EntityKind::Place => place::Entity::find()
                .filter(place::Column::CityId.eq(parent_id))
                .order_by_asc(place::Column::CreatedAt)
                .order_by_asc(place::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect(),
            EntityKind::Review => review::Entity::find()
                .filter(review::Column::PlaceId.eq(parent_id))
                .order_by_asc(review::Column::CreatedAt)
                .order_by_asc(review::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect(),
            EntityKind::Amenity | EntityKind::State | EntityKind::User => Vec::new(),
        };
        Ok(rows)
    }

    async fn amenity_ids(&self, place_id: &str) -> Result<Vec<String>, ServiceError> {
        let links = place_amenity::Entity::find()
            .filter(place_amenity::Column::PlaceId.eq(place_id))
            .order_by_asc(place_amenity::Column::AmenityId)
            .all(&self.db)
            .await?;
        Ok(links.into_iter().map(|l| l.amenity_id).collect())
    }

    async fn link_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError> {
        let key = (place_id.to_string(), amenity_id.to_string());
        if place_amenity::Entity::find_by_id(key).one(&self.db).await?.is_some() {
            return Ok(false);
        }
        let link = place_amenity::ActiveModel {
            place_id: Set(place_id.to_string()),
            amenity_id: Set(amenity_id.to_string()),
        };
        place_amenity::Entity::insert(link).exec_without_returning(&self.db).await?;
        Ok(true)
    }

    async fn unlink_amenity(&self, place_id: &str, amenity_id: &str) -> Result<bool, ServiceError> {
        let res = place_amenity::Entity::delete_by_id((place_id.to_string(), amenity_id.to_string()))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn close(&self) -> Result<(), ServiceError> {
        self.db.clone().close().await?;
        info!("database connections closed");
        Ok(())
    }
}
