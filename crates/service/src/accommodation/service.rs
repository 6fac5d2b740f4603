use std::sync::Arc;

use models::accommodation::{Accommodation, NewAccommodation};
use tracing::{debug, info, instrument, warn};

use crate::accommodation::store::RecordStore;
use crate::errors::ServiceError;

/// Application service for the accommodation listing.
///
/// Orchestrates the injected [`RecordStore`] so callers see the same contract
/// whichever backend is configured. Errors from the store are passed through
/// unchanged; there is no retry.
#[derive(Clone)]
pub struct AccommodationService {
    store: Arc<dyn RecordStore>,
}

impl AccommodationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self { Self { store } }

    pub fn backend(&self) -> &'static str { self.store.backend() }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn list_all(&self) -> Result<Vec<Accommodation>, ServiceError> {
        let all = self.store.list_all().await?;
        debug!(count = all.len(), "listed accommodations");
        Ok(all)
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn get(&self, id: i32) -> Result<Accommodation, ServiceError> {
        self.store.get(id).await
    }

    /// Case-insensitive substring filter on `location`. The needle is
    /// lower-cased here so every backend compares against the same form;
    /// whitespace is part of the needle and is not trimmed.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::accommodation::NewAccommodation;
    /// use service::accommodation::AccommodationService;
    /// use service::file::accommodation_store::FileRecordStore;
    ///
    /// let path = std::env::temp_dir().join(format!("doc_{}.json", uuid::Uuid::new_v4()));
    /// let store = tokio_test::block_on(FileRecordStore::open(&path)).unwrap();
    /// let svc = AccommodationService::new(Arc::new(store));
    /// let input = NewAccommodation {
    ///     name: "Loft".into(),
    ///     image: "a.png".into(),
    ///     location: "São Paulo".into(),
    ///     price: 150.0,
    ///     is_favorited: false,
    /// };
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// let hits = tokio_test::block_on(svc.filter_by_location("PAULO")).unwrap();
    /// assert_eq!(hits, vec![created]);
    /// # let _ = std::fs::remove_file(path);
    /// ```
    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn filter_by_location(&self, location: &str) -> Result<Vec<Accommodation>, ServiceError> {
        let needle = normalize_location(location);
        let hits = self.store.filter_by_location(&needle).await?;
        debug!(needle = %needle, count = hits.len(), "filtered accommodations");
        Ok(hits)
    }

    #[instrument(skip(self, input), fields(backend = self.store.backend(), name = %input.name))]
    pub async fn create(&self, input: NewAccommodation) -> Result<Accommodation, ServiceError> {
        match self.store.create(input).await {
            Ok(created) => {
                info!(id = created.id, location = %created.location, "accommodation_created");
                Ok(created)
            }
            Err(e) => {
                if let ServiceError::Validation(msg) = &e {
                    warn!(reason = %msg, "accommodation_rejected");
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn update_favorite(&self, id: i32, value: bool) -> Result<Accommodation, ServiceError> {
        let updated = self.store.update_favorite(id, value).await?;
        info!(id, is_favorited = value, "favorite_updated");
        Ok(updated)
    }
}

/// Single case-folding rule for location comparisons.
pub fn normalize_location(location: &str) -> String {
    location.to_lowercase()
}
