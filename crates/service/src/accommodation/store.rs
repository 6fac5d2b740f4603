use async_trait::async_trait;
use models::accommodation::{Accommodation, NewAccommodation};

use crate::errors::ServiceError;

/// Durable CRUD primitives over accommodation records.
///
/// Implemented by the file backend ([`crate::file::accommodation_store::FileRecordStore`])
/// and the table backend ([`crate::db::accommodation_store::TableRecordStore`]).
/// Mutations are durable before they return.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Every record, in a stable order.
    async fn list_all(&self) -> Result<Vec<Accommodation>, ServiceError>;

    async fn get(&self, id: i32) -> Result<Accommodation, ServiceError>;

    /// Records whose location contains `needle`. `needle` is already case-folded;
    /// an empty needle matches everything.
    async fn filter_by_location(&self, needle: &str) -> Result<Vec<Accommodation>, ServiceError>;

    async fn create(&self, input: NewAccommodation) -> Result<Accommodation, ServiceError>;

    async fn update_favorite(&self, id: i32, value: bool) -> Result<Accommodation, ServiceError>;
}
