//! Accommodation entity: the single record type of the listing service.
//!
//! The sea-orm `Model` doubles as the JSON shape persisted by the file store
//! and returned over HTTP, so both backends expose identical records.
use sea_orm::{
    entity::prelude::*,
    sea_query::{self, Table},
    ActiveModelTrait, ConnectionTrait, DbBackend, NotSet, Set,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accommodations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    #[sea_orm(column_type = "Text")]
    pub location: String,
    pub price: f64,
    #[sea_orm(column_name = "isfavorited")]
    #[serde(rename = "isFavorited", default)]
    pub is_favorited: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Stored accommodation record.
pub type Accommodation = Model;

/// Fields accepted on creation; `id` is always assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAccommodation {
    pub name: String,
    pub image: String,
    pub location: String,
    pub price: f64,
    #[serde(rename = "isFavorited", default)]
    pub is_favorited: bool,
}

impl NewAccommodation {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_text("name", &self.name)?;
        validate_text("image", &self.image)?;
        validate_text("location", &self.location)?;
        validate_price(self.price)
    }

    /// Build the stored record once an id has been assigned.
    pub fn into_record(self, id: i32) -> Model {
        Model {
            id,
            name: self.name,
            image: self.image,
            location: self.location,
            price: self.price,
            is_favorited: self.is_favorited,
        }
    }
}

pub fn validate_text(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ModelError::Validation(format!("price must be a non-negative number, got {price}")));
    }
    Ok(())
}

/// Case-insensitive substring match used by the in-process filter path.
/// `needle` is expected to be case-folded already.
pub fn location_matches(record: &Model, needle: &str) -> bool {
    needle.is_empty() || record.location.to_lowercase().contains(needle)
}

/// Create the table if it is missing.
///
/// On PostgreSQL, tables written by earlier revisions of the service are
/// brought in line: the unquoted `isFavorited` column (stored as
/// `isfavorited`, nullable) is added when absent and its NULLs read as
/// `false`, and a `REAL` price is widened to `DOUBLE PRECISION`.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), ModelError> {
    let backend = db.get_database_backend();
    let stmt = Table::create()
        .table(Entity)
        .if_not_exists()
        .col(sea_query::ColumnDef::new(Column::Id).integer().not_null().auto_increment().primary_key())
        .col(sea_query::ColumnDef::new(Column::Name).text().not_null())
        .col(sea_query::ColumnDef::new(Column::Image).text().not_null())
        .col(sea_query::ColumnDef::new(Column::Location).text().not_null())
        .col(sea_query::ColumnDef::new(Column::Price).double().not_null())
        .col(sea_query::ColumnDef::new(Column::IsFavorited).boolean().not_null().default(false))
        .to_owned();
    db.execute(backend.build(&stmt)).await?;

    if backend == DbBackend::Postgres {
        for sql in [
            "ALTER TABLE accommodations ADD COLUMN IF NOT EXISTS isfavorited BOOLEAN DEFAULT FALSE",
            "UPDATE accommodations SET isfavorited = FALSE WHERE isfavorited IS NULL",
            "ALTER TABLE accommodations ALTER COLUMN price TYPE DOUBLE PRECISION",
        ] {
            db.execute_unprepared(sql).await?;
        }
    }
    debug!(?backend, "accommodations schema ensured");
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewAccommodation) -> Result<Model, ModelError> {
    input.validate()?;
    let am = ActiveModel {
        id: NotSet,
        name: Set(input.name),
        image: Set(input.image),
        location: Set(input.location),
        price: Set(input.price),
        is_favorited: Set(input.is_favorited),
    };
    Ok(am.insert(db).await?)
}

/// Set the favorite flag; `None` when no row has that id.
pub async fn set_favorited<C: ConnectionTrait>(db: &C, id: i32, value: bool) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.is_favorited = Set(value);
    Ok(Some(am.update(db).await?))
}
