use std::collections::HashSet;
use std::time::Duration;

use models::{amenity, city, place, review, state, user};
use serde_json::{json, Value};

use super::ResourceService;
use crate::errors::ServiceError;
use crate::test_support::{self, both_backends, put};

fn body(v: Value) -> Vec<u8> {
    serde_json::to_vec(&v).unwrap_or_default()
}

#[tokio::test]
async fn create_assigns_unique_ids_and_equal_timestamps() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let states = ResourceService::<state::Model>::new(store.clone());
        let mut ids = HashSet::new();
        for name in ["A", "B", "C"] {
            let created = states.create(None, &body(json!({ "name": name }))).await?;
            let id = created["id"].as_str().unwrap_or_default().to_string();
            assert!(!id.is_empty());
            assert!(ids.insert(id));
            assert_eq!(created["created_at"], created["updated_at"]);
            assert_eq!(created["__class__"], "State");
            assert_eq!(created["name"], name);
        }
        assert_eq!(states.list().await?.len(), 3);
    });
    Ok(())
}

#[tokio::test]
async fn create_rejects_bad_bodies() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let amenities = ResourceService::<amenity::Model>::new(store.clone());
        assert!(matches!(amenities.create(None, b"nope").await, Err(ServiceError::NotAJson)));
        assert!(matches!(amenities.create(None, b"").await, Err(ServiceError::NotAJson)));
        assert!(matches!(amenities.create(None, b"{}").await, Err(ServiceError::MissingField("name"))));
        let numeric = amenities.create(None, &body(json!({"name": 5}))).await?;
        assert_eq!(numeric["name"], "5");

        let users = ResourceService::<user::Model>::new(store.clone());
        assert!(matches!(
            users.create(None, &body(json!({"email": "a@b.c"}))).await,
            Err(ServiceError::MissingField("password"))
        ));
        let created = users.create(None, &body(json!({"email": "a@b.c", "password": "pwd"}))).await?;
        assert_eq!(created["email"], "a@b.c");
        assert!(created.get("password").is_none());
    });
    Ok(())
}

#[tokio::test]
async fn place_creation_checks_in_order() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let s = put(&store, test_support::state("CA")).await?;
        let c = put(&store, test_support::city(&s.id, "SF")).await?;
        let u = put(&store, test_support::user("owner@x.y")).await?;
        let places = ResourceService::<place::Model>::new(store.clone());

        // unknown city wins over a bad body
        assert!(matches!(places.create(Some("nope"), b"garbage").await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(places.create(Some(&c.id), b"garbage").await, Err(ServiceError::NotAJson)));
        assert!(matches!(
            places.create(Some(&c.id), &body(json!({"name": "Loft"}))).await,
            Err(ServiceError::MissingField("user_id"))
        ));
        assert!(matches!(
            places.create(Some(&c.id), &body(json!({"user_id": u.id}))).await,
            Err(ServiceError::MissingField("name"))
        ));
        assert!(matches!(
            places.create(Some(&c.id), &body(json!({"user_id": "ghost", "name": "Loft"}))).await,
            Err(ServiceError::NotFound { .. })
        ));
        // a non-string owner id resolves to no user
        assert!(matches!(
            places.create(Some(&c.id), &body(json!({"user_id": 42, "name": "Loft"}))).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            places.create(Some(&c.id), &body(json!({"user_id": null, "name": "Loft"}))).await,
            Err(ServiceError::NotFound { .. })
        ));

        let created = places
            .create(
                Some(&c.id),
                &body(json!({"user_id": u.id, "name": "Loft", "city_id": "ignored", "number_rooms": 2, "id": "mine"})),
            )
            .await?;
        assert_eq!(created["city_id"], c.id.as_str());
        assert_eq!(created["number_rooms"], 2);
        assert_ne!(created["id"], "mine");
        assert_eq!(places.list_by_parent(&c.id).await?.len(), 1);
        assert!(matches!(places.list_by_parent("nope").await, Err(ServiceError::NotFound { .. })));
    });
    Ok(())
}

#[tokio::test]
async fn review_creation_requires_existing_user() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let s = put(&store, test_support::state("CA")).await?;
        let c = put(&store, test_support::city(&s.id, "SF")).await?;
        let u = put(&store, test_support::user("owner@x.y")).await?;
        let p = put(&store, test_support::place(&c.id, &u.id, "Loft")).await?;
        let reviews = ResourceService::<review::Model>::new(store.clone());

        assert!(matches!(
            reviews.create(Some(&p.id), &body(json!({"user_id": u.id}))).await,
            Err(ServiceError::MissingField("text"))
        ));
        assert!(matches!(
            reviews.create(Some(&p.id), &body(json!({"user_id": "ghost", "text": "meh"}))).await,
            Err(ServiceError::NotFound { .. })
        ));
        let created = reviews.create(Some(&p.id), &body(json!({"user_id": u.id, "text": "great"}))).await?;
        assert_eq!(created["place_id"], p.id.as_str());
        assert_eq!(reviews.list_by_parent(&p.id).await?.len(), 1);
    });
    Ok(())
}

#[tokio::test]
async fn update_skips_immutable_fields_and_advances_updated_at() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let cities = ResourceService::<city::Model>::new(store.clone());
        let s = put(&store, test_support::state("CA")).await?;
        let created = cities.create(Some(&s.id), &body(json!({"name": "SF"}))).await?;
        let id = created["id"].as_str().unwrap_or_default().to_string();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let updated = cities
            .update(&id, &body(json!({"id": "x", "created_at": "y", "state_id": "z", "bogus": 1})))
            .await?;
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["name"], "SF");
        assert_eq!(updated["state_id"], s.id.as_str());
        assert_eq!(updated["created_at"], created["created_at"]);
        assert!(updated["updated_at"].as_str() > created["updated_at"].as_str());

        let renamed = cities.update(&id, &body(json!({"name": "San Francisco"}))).await?;
        assert_eq!(renamed["name"], "San Francisco");
        assert_eq!(cities.get(&id).await?["name"], "San Francisco");

        assert!(matches!(cities.update("missing", b"garbage").await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(cities.update(&id, b"garbage").await, Err(ServiceError::NotAJson)));
    });
    Ok(())
}

#[tokio::test]
async fn user_email_is_immutable() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let users = ResourceService::<user::Model>::new(store.clone());
        let created = users.create(None, &body(json!({"email": "a@b.c", "password": "p"}))).await?;
        let id = created["id"].as_str().unwrap_or_default().to_string();
        let updated = users.update(&id, &body(json!({"email": "new@b.c", "last_name": "Holberton"}))).await?;
        assert_eq!(updated["email"], "a@b.c");
        assert_eq!(updated["last_name"], "Holberton");
        let numeric = users.update(&id, &body(json!({"first_name": 42}))).await?;
        assert_eq!(numeric["first_name"], "42");
    });
    Ok(())
}

#[tokio::test]
async fn delete_twice_is_not_found() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let states = ResourceService::<state::Model>::new(store.clone());
        let created = states.create(None, &body(json!({"name": "Gone"}))).await?;
        let id = created["id"].as_str().unwrap_or_default().to_string();
        states.delete(&id).await?;
        assert!(matches!(states.delete(&id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(states.get(&id).await, Err(ServiceError::NotFound { .. })));
    });
    Ok(())
}
