use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use models::accommodation::{Accommodation, NewAccommodation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{errors::JsonApiError, routes::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// City (or any part of the location) to look for, case-insensitive.
    pub cidade: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FavoriteInput {
    #[serde(rename = "isFavorited")]
    pub is_favorited: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i32,
    pub data: Accommodation,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub message: &'static str,
    pub id: i32,
    #[serde(rename = "isFavorited")]
    pub is_favorited: bool,
}

#[utoipa::path(
    get, path = "/acomodacoes", tag = "acomodacoes",
    responses(
        (status = 200, description = "All accommodations", body = [crate::openapi::AccommodationDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Accommodation>>, JsonApiError> {
    let all = state.accommodations.list_all().await?;
    Ok(Json(all))
}

#[utoipa::path(
    get, path = "/acomodacoes/filtrar", tag = "acomodacoes",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching accommodations, possibly none", body = [crate::openapi::AccommodationDoc]),
        (status = 400, description = "Missing `cidade`"),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn filter(State(state): State<ServerState>, Query(q): Query<FilterQuery>) -> Result<Json<Vec<Accommodation>>, JsonApiError> {
    let hits = state.accommodations.filter_by_location(&q.cidade).await?;
    Ok(Json(hits))
}

#[utoipa::path(
    get, path = "/acomodacoes/{id}", tag = "acomodacoes",
    params(("id" = i32, Path, description = "Accommodation id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::AccommodationDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Accommodation>, JsonApiError> {
    let found = state.accommodations.get(id).await?;
    Ok(Json(found))
}

#[utoipa::path(
    post, path = "/acomodacoes", tag = "acomodacoes",
    request_body = crate::openapi::NewAccommodationDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::CreatedDoc),
        (status = 500, description = "Validation Error naming the field, or a storage failure without detail", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<NewAccommodation>, JsonRejection>,
) -> Result<Json<CreatedResponse>, JsonApiError> {
    let Json(input) = payload.map_err(|e| JsonApiError::validation(e.body_text()))?;
    let created = state.accommodations.create(input).await?;
    info!(id = created.id, "accommodation created via api");
    Ok(Json(CreatedResponse { message: "Acomodação criada com sucesso", id: created.id, data: created }))
}

#[utoipa::path(
    patch, path = "/acomodacoes/{id}/favoritar", tag = "acomodacoes",
    params(("id" = i32, Path, description = "Accommodation id")),
    request_body = crate::openapi::FavoriteInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::FavoriteDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_favorite(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<FavoriteInput>,
) -> Result<Json<FavoriteResponse>, JsonApiError> {
    let updated = state.accommodations.update_favorite(id, input.is_favorited).await?;
    Ok(Json(FavoriteResponse {
        message: "Status de favorito atualizado",
        id: updated.id,
        is_favorited: updated.is_favorited,
    }))
}
