#![cfg(test)]
use std::path::PathBuf;

use models::accommodation::NewAccommodation;
use sea_orm::Database;

use crate::db::accommodation_store::TableRecordStore;

pub fn loft() -> NewAccommodation {
    NewAccommodation {
        name: "Loft".into(),
        image: "a.png".into(),
        location: "São Paulo".into(),
        price: 150.0,
        is_favorited: false,
    }
}

pub fn temp_json_path() -> PathBuf {
    std::env::temp_dir().join(format!("acomodacoes_{}.json", uuid::Uuid::new_v4()))
}

/// Fresh table store on a throwaway SQLite file.
pub async fn sqlite_store() -> Result<(TableRecordStore, PathBuf), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("acomodacoes_{}.db", uuid::Uuid::new_v4()));
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display())).await?;
    let store = TableRecordStore::new(db).await?;
    Ok((store, path))
}

/// Behaviour every `RecordStore` must share, run against each backend.
/// All checks expect an empty store.
pub mod conformance {
    use anyhow::ensure;
    use models::accommodation::NewAccommodation;

    use super::loft;
    use crate::accommodation::store::RecordStore;
    use crate::errors::ServiceError;

    fn listing(name: &str, location: &str, price: f64) -> NewAccommodation {
        NewAccommodation {
            name: name.into(),
            image: format!("{}.png", name.to_lowercase()),
            location: location.into(),
            price,
            is_favorited: false,
        }
    }

    pub async fn run_all(store: &dyn RecordStore) -> anyhow::Result<()> {
        empty_store(store).await?;
        let ids = seed(store).await?;
        round_trip(store).await?;
        filter_matches_list_subset(store).await?;
        favorite_toggle(store, ids[1]).await?;
        missing_ids(store).await?;
        accented_upper_case_location(store).await?;
        Ok(())
    }

    async fn empty_store(store: &dyn RecordStore) -> anyhow::Result<()> {
        ensure!(store.list_all().await?.is_empty(), "store should start empty");
        ensure!(store.filter_by_location("").await?.is_empty());
        ensure!(matches!(store.get(999).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    async fn seed(store: &dyn RecordStore) -> anyhow::Result<Vec<i32>> {
        let mut ids = Vec::new();
        for input in [
            listing("Loft", "São Paulo", 150.0),
            listing("Casa", "Rio de Janeiro", 320.5),
            listing("Studio", "Grande SAO PAULO", 0.0),
            listing("Chale", "Campos do Jordao", 410.0),
        ] {
            ids.push(store.create(input).await?.id);
        }
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        ensure!(unique.len() == ids.len(), "ids must be unique: {ids:?}");
        ensure!(store.list_all().await?.len() == 4);
        Ok(ids)
    }

    async fn round_trip(store: &dyn RecordStore) -> anyhow::Result<()> {
        let created = store.create(NewAccommodation { is_favorited: true, ..listing("Pousada", "Paraty", 99.9) }).await?;
        let fetched = store.get(created.id).await?;
        ensure!(fetched == created, "get(create(r).id) must equal create(r): {fetched:?} vs {created:?}");
        ensure!(fetched.is_favorited, "explicit favorite flag on create is kept");
        Ok(())
    }

    async fn filter_matches_list_subset(store: &dyn RecordStore) -> anyhow::Result<()> {
        let all = store.list_all().await?;
        for needle in ["paulo", "rio", "de j", "", "zzz", "o"] {
            let expected: Vec<i32> = all
                .iter()
                .filter(|r| r.location.to_lowercase().contains(needle))
                .map(|r| r.id)
                .collect();
            let mut got: Vec<i32> = store.filter_by_location(needle).await?.iter().map(|r| r.id).collect();
            got.sort_unstable();
            let mut want = expected.clone();
            want.sort_unstable();
            ensure!(got == want, "filter({needle:?}) returned {got:?}, expected {want:?}");
        }
        ensure!(store.filter_by_location("").await?.len() == all.len());
        ensure!(store.filter_by_location("paulo").await?.len() == 2);
        Ok(())
    }

    async fn favorite_toggle(store: &dyn RecordStore, id: i32) -> anyhow::Result<()> {
        let before = store.get(id).await?;

        let first = store.update_favorite(id, true).await?;
        let after_once = store.get(id).await?;
        ensure!(after_once.is_favorited && first == after_once);
        ensure!(after_once.name == before.name && after_once.location == before.location);
        ensure!(after_once.image == before.image && after_once.price == before.price);

        store.update_favorite(id, true).await?;
        ensure!(store.get(id).await? == after_once, "same value twice must be idempotent");

        let cleared = store.update_favorite(id, false).await?;
        ensure!(!cleared.is_favorited);
        ensure!(store.get(id).await? == before);
        Ok(())
    }

    async fn missing_ids(store: &dyn RecordStore) -> anyhow::Result<()> {
        let count = store.list_all().await?.len();
        ensure!(matches!(store.get(-1).await, Err(ServiceError::NotFound(_))));
        ensure!(matches!(store.update_favorite(999, true).await, Err(ServiceError::NotFound(_))));
        ensure!(store.list_all().await?.len() == count, "failed update must not add rows");
        Ok(())
    }

    /// Folding must cover non-ASCII letters: `SÃO PAULO` contains `são`.
    async fn accented_upper_case_location(store: &dyn RecordStore) -> anyhow::Result<()> {
        let upper = store.create(listing("Flat", "SÃO PAULO", 210.0)).await?;
        let all = store.list_all().await?;
        for needle in ["são", "ão p", "são paulo"] {
            let want: Vec<i32> = all.iter().filter(|r| r.location.to_lowercase().contains(needle)).map(|r| r.id).collect();
            let mut got: Vec<i32> = store.filter_by_location(needle).await?.iter().map(|r| r.id).collect();
            got.sort_unstable();
            ensure!(got.contains(&upper.id), "filter({needle:?}) missed {:?}", upper.location);
            ensure!(got == want, "filter({needle:?}) returned {got:?}, expected {want:?}");
        }
        Ok(())
    }

    pub async fn loft_scenario(store: &dyn RecordStore) -> anyhow::Result<()> {
        let created = store.create(loft()).await?;
        ensure!(created.id == 1, "first id should be 1, got {}", created.id);
        ensure!(!created.is_favorited);

        let hits = store.filter_by_location("paulo").await?;
        ensure!(hits == vec![created.clone()]);

        store.update_favorite(1, true).await?;
        ensure!(store.get(1).await?.is_favorited);
        ensure!(matches!(store.get(999).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
