use std::{
    path::PathBuf,
    sync::atomic::{AtomicI32, Ordering},
};

use async_trait::async_trait;
use models::accommodation::{location_matches, Accommodation, NewAccommodation};
use tracing::{debug, info};

use crate::accommodation::store::RecordStore;
use crate::errors::ServiceError;
use crate::storage::json_array_store::JsonArrayStore;

/// File backend: every record lives in one JSON array document.
///
/// Ids come from a high-water mark that only moves up: a new record gets one
/// more than the largest id seen in the document or issued by this instance,
/// so ids are never reused while the process lives.
pub struct FileRecordStore {
    docs: JsonArrayStore<Accommodation>,
    last_issued: AtomicI32,
}

impl FileRecordStore {
    /// Open (or create) the document at `path`.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let docs: JsonArrayStore<Accommodation> = JsonArrayStore::new(path).await?;
        let existing = docs.load().await?;
        let last = existing.iter().map(|r| r.id).max().unwrap_or(0);
        info!(path = %docs.path().display(), records = existing.len(), last_id = last, "file record store opened");
        Ok(Self { docs, last_issued: AtomicI32::new(last) })
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    fn backend(&self) -> &'static str { "file" }

    async fn list_all(&self) -> Result<Vec<Accommodation>, ServiceError> {
        self.docs.load().await
    }

    async fn get(&self, id: i32) -> Result<Accommodation, ServiceError> {
        self.docs
            .load()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::not_found("accommodation", id))
    }

    async fn filter_by_location(&self, needle: &str) -> Result<Vec<Accommodation>, ServiceError> {
        let mut all = self.docs.load().await?;
        all.retain(|r| location_matches(r, needle));
        Ok(all)
    }

    async fn create(&self, input: NewAccommodation) -> Result<Accommodation, ServiceError> {
        input.validate()?;
        let last_issued = &self.last_issued;
        self.docs
            .update(move |items| {
                let in_doc = items.iter().map(|r| r.id).max().unwrap_or(0);
                let id = in_doc
                    .max(last_issued.load(Ordering::SeqCst))
                    .checked_add(1)
                    .ok_or_else(|| ServiceError::storage(format!("no id left after {in_doc}")))?;
                last_issued.fetch_max(id, Ordering::SeqCst);
                let rec = input.into_record(id);
                items.push(rec.clone());
                debug!(id, "appended record to document");
                Ok(rec)
            })
            .await
    }

    async fn update_favorite(&self, id: i32, value: bool) -> Result<Accommodation, ServiceError> {
        self.docs
            .update(|items| {
                let rec = items
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ServiceError::not_found("accommodation", id))?;
                rec.is_favorited = value;
                Ok(rec.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{conformance, loft, temp_json_path};
    use std::sync::Arc;

    async fn store() -> (FileRecordStore, PathBuf) {
        let path = temp_json_path();
        (FileRecordStore::open(&path).await.expect("open file store"), path)
    }

    #[tokio::test]
    async fn file_store_conformance() -> anyhow::Result<()> {
        let (s, path) = store().await;
        conformance::run_all(&s).await?;
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn file_store_loft_scenario() -> anyhow::Result<()> {
        let (s, path) = store().await;
        conformance::loft_scenario(&s).await?;
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_lists_empty() -> anyhow::Result<()> {
        let path = temp_json_path();
        tokio::fs::write(&path, "[{\"id\": 1, \"name\": ").await?;
        let s = FileRecordStore::open(&path).await?;

        assert!(s.list_all().await?.is_empty());
        assert!(s.filter_by_location("").await?.is_empty());
        assert!(matches!(s.get(1).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(s.create(loft()).await, Err(ServiceError::Storage(_))));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn ids_continue_after_reopen() -> anyhow::Result<()> {
        let (s, path) = store().await;
        let a = s.create(loft()).await?;
        let b = s.create(loft()).await?;
        assert_eq!((a.id, b.id), (1, 2));
        drop(s);

        let reopened = FileRecordStore::open(&path).await?;
        let c = reopened.create(loft()).await?;
        assert_eq!(c.id, 3);
        assert_eq!(reopened.list_all().await?.len(), 3);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn ids_not_reused_when_document_shrinks() -> anyhow::Result<()> {
        let (s, path) = store().await;
        s.create(loft()).await?;
        s.create(loft()).await?;
        // simulate an external edit dropping the newest record
        let mut docs: Vec<Accommodation> = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        docs.pop();
        tokio::fs::write(&path, serde_json::to_vec(&docs)?).await?;

        let next = s.create(loft()).await?;
        assert_eq!(next.id, 3);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_is_a_storage_error() -> anyhow::Result<()> {
        let path = temp_json_path();
        let doc = format!(
            r#"[{{"id": {}, "name": "Topo", "image": "t.png", "location": "Natal", "price": 1.0}}]"#,
            i32::MAX
        );
        tokio::fs::write(&path, &doc).await?;
        let s = FileRecordStore::open(&path).await?;

        assert!(matches!(s.create(loft()).await, Err(ServiceError::Storage(_))));
        assert_eq!(tokio::fs::read_to_string(&path).await?, doc);
        assert_eq!(s.list_all().await?.len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn legacy_records_without_flag_read_as_not_favorited() -> anyhow::Result<()> {
        let path = temp_json_path();
        tokio::fs::write(
            &path,
            r#"[{"id": 5, "name": "Chalé", "image": "c.png", "location": "Gramado", "price": 300.0}]"#,
        )
        .await?;
        let s = FileRecordStore::open(&path).await?;

        let rec = s.get(5).await?;
        assert!(!rec.is_favorited);
        assert_eq!(s.create(loft()).await?.id, 6);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_keep_every_record() -> anyhow::Result<()> {
        let (s, path) = store().await;
        let s = Arc::new(s);
        let mut tasks = Vec::new();
        for i in 0..16 {
            let s = Arc::clone(&s);
            tasks.push(tokio::spawn(async move {
                let mut input = loft();
                input.name = format!("Loft {i}");
                s.create(input).await
            }));
        }
        for t in tasks {
            t.await??;
        }

        let all = s.list_all().await?;
        assert_eq!(all.len(), 16);
        let mut ids: Vec<i32> = all.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
