use models::{EntityKind, Record};

use crate::test_support::{self, both_backends, put};

#[tokio::test]
async fn save_get_all_count() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let ca = put(&store, test_support::state("California")).await?;
        let nv = put(&store, test_support::state("Nevada")).await?;
        put(&store, test_support::amenity("Wifi")).await?;

        let got = store.get(EntityKind::State, &ca.id).await?;
        assert_eq!(got, Some(Record::State(ca.clone())));
        assert_eq!(store.get(EntityKind::Amenity, &ca.id).await?, None);
        assert_eq!(store.get(EntityKind::State, "missing").await?, None);

        let all = store.all(EntityKind::State).await?;
        assert_eq!(all.len(), 2);
        assert!(all.contains_key(&nv.id));
        assert_eq!(store.count(EntityKind::State).await?, 2);
        assert_eq!(store.count(EntityKind::Amenity).await?, 1);
        assert_eq!(store.count(EntityKind::Review).await?, 0);
    });
    Ok(())
}

#[tokio::test]
async fn save_replaces_existing() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let mut s = put(&store, test_support::state("Old")).await?;
        s.name = "New".into();
        store.save(s.clone().into()).await?;
        assert_eq!(store.count(EntityKind::State).await?, 1);
        assert_eq!(store.get(EntityKind::State, &s.id).await?, Some(Record::State(s)));
    });
    Ok(())
}

#[tokio::test]
async fn delete_does_not_cascade() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let s = put(&store, test_support::state("Oregon")).await?;
        let c = put(&store, test_support::city(&s.id, "Portland")).await?;
        assert!(store.delete(EntityKind::State, &s.id).await?);
        assert!(!store.delete(EntityKind::State, &s.id).await?);
        assert!(store.get(EntityKind::City, &c.id).await?.is_some());
    });
    Ok(())
}

#[tokio::test]
async fn children_filters_by_parent() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let s1 = put(&store, test_support::state("A")).await?;
        let s2 = put(&store, test_support::state("B")).await?;
        let c1 = put(&store, test_support::city(&s1.id, "one")).await?;
        let c2 = put(&store, test_support::city(&s1.id, "two")).await?;
        put(&store, test_support::city(&s2.id, "three")).await?;

        let kids = store.children(EntityKind::City, &s1.id).await?;
        let mut ids: Vec<&str> = kids.iter().map(Record::id).collect();
        ids.sort();
        let mut expected = vec![c1.id.as_str(), c2.id.as_str()];
        expected.sort();
        assert_eq!(ids, expected);
        assert!(store.children(EntityKind::City, "nope").await?.is_empty());
    });
    Ok(())
}

#[tokio::test]
async fn amenity_links() -> Result<(), anyhow::Error> {
    both_backends!(|store| {
        let s = put(&store, test_support::state("S")).await?;
        let c = put(&store, test_support::city(&s.id, "C")).await?;
        let u = put(&store, test_support::user("a@b.c")).await?;
        let p = put(&store, test_support::place(&c.id, &u.id, "P")).await?;
        let wifi = put(&store, test_support::amenity("Wifi")).await?;
        let pool = put(&store, test_support::amenity("Pool")).await?;

        assert!(store.link_amenity(&p.id, &wifi.id).await?);
        assert!(!store.link_amenity(&p.id, &wifi.id).await?);
        assert!(store.link_amenity(&p.id, &pool.id).await?);
        let mut ids = store.amenity_ids(&p.id).await?;
        ids.sort();
        let mut expected = vec![wifi.id.clone(), pool.id.clone()];
        expected.sort();
        assert_eq!(ids, expected);

        assert!(store.unlink_amenity(&p.id, &pool.id).await?);
        assert!(!store.unlink_amenity(&p.id, &pool.id).await?);
        assert_eq!(store.amenity_ids(&p.id).await?, vec![wifi.id.clone()]);

        assert!(store.delete(EntityKind::Amenity, &wifi.id).await?);
        assert!(store.amenity_ids(&p.id).await?.is_empty());
    });
    Ok(())
}

#[tokio::test]
async fn file_storage_survives_reopen() -> Result<(), anyhow::Error> {
    let dir = test_support::TempDir::new();
    let s = test_support::state("Persisted");
    {
        let store = crate::storage::FileStorage::open(&dir.0).await?;
        crate::storage::Storage::save(&store, s.clone().into()).await?;
    }
    let reopened = crate::storage::FileStorage::open(&dir.0).await?;
    let got = crate::storage::Storage::get(&reopened, EntityKind::State, &s.id).await?;
    assert_eq!(got, Some(Record::State(s.clone())));

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(dir.0.join("file.json"))?)?;
    assert_eq!(raw[format!("State.{}", s.id)]["__class__"], "State");
    Ok(())
}

#[tokio::test]
async fn file_storage_prunes_dangling_links_on_open() -> Result<(), anyhow::Error> {
    use crate::storage::{FileStorage, Storage};

    let dir = test_support::TempDir::new();
    let (place, wifi) = {
        let store = FileStorage::open(&dir.0).await?;
        let s = test_support::state("S");
        let c = test_support::city(&s.id, "C");
        let u = test_support::user("a@b.c");
        let p = test_support::place(&c.id, &u.id, "P");
        let wifi = test_support::amenity("Wifi");
        let records: [Record; 5] = [s.into(), c.into(), u.into(), p.clone().into(), wifi.clone().into()];
        for record in records {
            store.save(record).await?;
        }
        // links left behind by deletes that never reached the links file
        assert!(store.link_amenity(&p.id, &wifi.id).await?);
        assert!(store.link_amenity(&p.id, "gone-amenity").await?);
        assert!(store.link_amenity("gone-place", &wifi.id).await?);
        (p, wifi)
    };

    let reopened = FileStorage::open(&dir.0).await?;
    assert_eq!(reopened.amenity_ids(&place.id).await?, vec![wifi.id.clone()]);
    assert!(reopened.amenity_ids("gone-place").await?.is_empty());

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(dir.0.join("place_amenity.json"))?)?;
    assert_eq!(raw.as_object().map(|m| m.len()), Some(1));
    assert_eq!(raw[place.id.as_str()], serde_json::json!([wifi.id]));
    Ok(())
}
