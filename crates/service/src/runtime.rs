//! Runtime wiring
//!
//! Opens the record store selected by configuration so binary and server
//! crates never construct backends themselves.

use std::sync::Arc;

use configs::{AppConfig, StorageBackend};
use tracing::info;

use crate::accommodation::store::RecordStore;
use crate::db::accommodation_store::TableRecordStore;
use crate::file::accommodation_store::FileRecordStore;

/// Ensure the data directory for the file backend exists.
pub async fn ensure_env(data_file: &str) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_file).await
}

/// Build the configured backend, owning its file handle path or connection pool.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match cfg.storage.backend {
        StorageBackend::File => {
            ensure_env(&cfg.storage.data_file).await?;
            Arc::new(FileRecordStore::open(&cfg.storage.data_file).await?)
        }
        StorageBackend::Table => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            Arc::new(TableRecordStore::new(db).await?)
        }
    };
    info!(backend = store.backend(), "record store opened");
    Ok(store)
}
