use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// JSON file holding an array of records, read in full and rewritten in full.
///
/// Nothing is cached: every read goes to disk, so edits made while the process
/// is running are visible. Mutations go through [`JsonArrayStore::update`],
/// which serializes read-modify-write cycles inside this process. Writers in
/// other processes are not coordinated.
pub struct JsonArrayStore<T> {
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonArrayStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Initialize the store from a path. Creates the file with an empty array if missing;
    /// an existing file is left untouched even when it does not parse.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        let missing = fs::metadata(&file_path).await.is_err();
        let store = Self { file_path, write_lock: Mutex::new(()), _records: PhantomData };
        if missing {
            store.save(&[]).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Read every record. A missing or unparsable document reads as empty and
    /// is logged; any other I/O failure is a storage error.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        match self.read_document().await? {
            Document::Missing => {
                warn!(path = %self.file_path.display(), "data file missing; treating as empty collection");
                Ok(Vec::new())
            }
            Document::Corrupt(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file does not parse; treating as empty collection");
                Ok(Vec::new())
            }
            Document::Parsed(items) => Ok(items),
        }
    }

    /// Read, mutate and rewrite the whole document under the write lock.
    ///
    /// If `f` fails nothing is written. A document that exists but does not
    /// parse is reported as a storage error rather than overwritten.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = match self.read_document().await? {
            Document::Missing => Vec::new(),
            Document::Corrupt(e) => {
                return Err(ServiceError::Storage(format!(
                    "refusing to rewrite corrupt document {}: {e}",
                    self.file_path.display()
                )))
            }
            Document::Parsed(items) => items,
        };
        let out = f(&mut items)?;
        self.save(&items).await?;
        Ok(out)
    }

    async fn read_document(&self) -> Result<Document<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::Missing),
            Err(e) => return Err(ServiceError::storage(format!("read {}: {e}", self.file_path.display()))),
        };
        Ok(match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => Document::Parsed(items),
            Err(e) => Document::Corrupt(e),
        })
    }

    /// Write the full document with 4-space indentation, via a sibling temp
    /// file so a failed write never leaves a truncated document behind.
    async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let mut data = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut data, formatter);
        items.serialize(&mut ser).map_err(ServiceError::storage)?;

        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, &data)
            .await
            .map_err(|e| ServiceError::storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::storage(format!("replace {}: {e}", self.file_path.display())))?;
        debug!(path = %self.file_path.display(), records = items.len(), bytes = data.len(), "document rewritten");
        Ok(())
    }
}

enum Document<T> {
    Missing,
    Corrupt(serde_json::Error),
    Parsed(Vec<T>),
}
