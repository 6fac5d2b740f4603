use async_trait::async_trait;
use models::accommodation::{self, location_matches, Accommodation, Entity as AccommodationEntity, NewAccommodation};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, warn};

use crate::accommodation::store::RecordStore;
use crate::errors::ServiceError;

/// Table backend: one row per record in `accommodations`, ids from the
/// database's auto-increment column.
///
/// The store owns its connection pool; each mutation runs in its own
/// transaction, which is committed before returning and rolled back on error.
pub struct TableRecordStore {
    db: DatabaseConnection,
}

impl TableRecordStore {
    /// Wrap a connection and make sure the table exists.
    pub async fn new(db: DatabaseConnection) -> Result<Self, ServiceError> {
        accommodation::ensure_schema(&db).await?;
        info!(backend = ?db.get_database_backend(), "table record store ready");
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }
}

/// Escape LIKE metacharacters so the needle only ever matches literally.
fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl RecordStore for TableRecordStore {
    fn backend(&self) -> &'static str { "table" }

    async fn list_all(&self) -> Result<Vec<Accommodation>, ServiceError> {
        let rows = AccommodationEntity::find()
            .order_by_asc(accommodation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Accommodation, ServiceError> {
        AccommodationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("accommodation", id))
    }

    /// Postgres narrows the rows with `LOWER(location) LIKE`; SQLite's `LOWER`
    /// only folds ASCII, so there every row is read. Either way the final
    /// match is `location_matches`, the same predicate the file backend uses.
    async fn filter_by_location(&self, needle: &str) -> Result<Vec<Accommodation>, ServiceError> {
        if needle.is_empty() {
            return self.list_all().await;
        }
        let mut rows = match self.db.get_database_backend() {
            DbBackend::Postgres => {
                let lowered = Expr::expr(Func::lower(Expr::col(accommodation::Column::Location)));
                AccommodationEntity::find()
                    .filter(lowered.like(LikeExpr::new(like_contains(needle)).escape('\\')))
                    .order_by_asc(accommodation::Column::Id)
                    .all(&self.db)
                    .await?
            }
            _ => self.list_all().await?,
        };
        rows.retain(|r| location_matches(r, needle));
        Ok(rows)
    }

    async fn create(&self, input: NewAccommodation) -> Result<Accommodation, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;
        match accommodation::create(&txn, input).await {
            Ok(created) => {
                txn.commit().await?;
                Ok(created)
            }
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    warn!(error = %rb, "rollback after failed insert also failed");
                }
                Err(e.into())
            }
        }
    }

    async fn update_favorite(&self, id: i32, value: bool) -> Result<Accommodation, ServiceError> {
        let txn = self.db.begin().await?;
        match accommodation::set_favorited(&txn, id, value).await {
            Ok(Some(updated)) => {
                txn.commit().await?;
                Ok(updated)
            }
            outcome => {
                if let Err(rb) = txn.rollback().await {
                    warn!(error = %rb, id, "rollback after failed favorite update also failed");
                }
                match outcome {
                    Ok(_) => Err(ServiceError::not_found("accommodation", id)),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}
