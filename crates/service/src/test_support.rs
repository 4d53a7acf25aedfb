#![cfg(test)]
use std::{path::PathBuf, sync::Arc};

use configs::DatabaseConfig;
use models::{amenity, city, place, review, state, timestamp, user, Record};
use uuid::Uuid;

use crate::storage::{DbStorage, FileStorage, Storage};

/// Temporary directory removed on drop.
pub struct TempDir(pub PathBuf);

impl TempDir {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("hbnb_test_{}", Uuid::new_v4()));
        Self(dir)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub async fn file_store() -> Result<(Arc<dyn Storage>, TempDir), anyhow::Error> {
    let dir = TempDir::new();
    let store = FileStorage::open(&dir.0).await?;
    Ok((Arc::new(store), dir))
}

pub async fn db_store() -> Result<Arc<dyn Storage>, anyhow::Error> {
    let cfg = DatabaseConfig::with_url("sqlite::memory:");
    Ok(Arc::new(DbStorage::connect(&cfg).await?))
}

/// Runs `$body` once against a fresh file store and once against an in-memory database.
macro_rules! both_backends {
    (|$store:ident| $body:block) => {{
        {
            let (store, _dir) = crate::test_support::file_store().await?;
            let $store = store;
            $body
        }
        {
            let $store = crate::test_support::db_store().await?;
            $body
        }
    }};
}
pub(crate) use both_backends;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn state(name: &str) -> state::Model {
    let now = timestamp::now();
    state::Model { id: new_id(), created_at: now, updated_at: now, name: name.to_string() }
}

pub fn city(state_id: &str, name: &str) -> city::Model {
    let now = timestamp::now();
    city::Model { id: new_id(), created_at: now, updated_at: now, state_id: state_id.to_string(), name: name.to_string() }
}

pub fn user(email: &str) -> user::Model {
    let now = timestamp::now();
    user::Model {
        id: new_id(),
        created_at: now,
        updated_at: now,
        email: email.to_string(),
        password: "hashed".to_string(),
        first_name: None,
        last_name: None,
    }
}

pub fn place(city_id: &str, user_id: &str, name: &str) -> place::Model {
    let now = timestamp::now();
    place::Model {
        id: new_id(),
        created_at: now,
        updated_at: now,
        city_id: city_id.to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        description: None,
        number_rooms: 0,
        number_bathrooms: 0,
        max_guest: 0,
        price_by_night: 0,
        latitude: None,
        longitude: None,
    }
}

pub fn review(place_id: &str, user_id: &str, text: &str) -> review::Model {
    let now = timestamp::now();
    review::Model {
        id: new_id(),
        created_at: now,
        updated_at: now,
        place_id: place_id.to_string(),
        user_id: user_id.to_string(),
        text: text.to_string(),
    }
}

pub fn amenity(name: &str) -> amenity::Model {
    let now = timestamp::now();
    amenity::Model { id: new_id(), created_at: now, updated_at: now, name: name.to_string() }
}

/// Saves `model` and hands it back.
pub async fn put<M: Clone + Into<Record>>(store: &Arc<dyn Storage>, model: M) -> Result<M, anyhow::Error> {
    store.save(model.clone().into()).await?;
    Ok(model)
}
