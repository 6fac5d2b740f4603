use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub backend: String }

#[derive(ToSchema, Serialize)]
pub struct AccommodationDoc {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub location: String,
    pub price: f64,
    #[serde(rename = "isFavorited")]
    pub is_favorited: bool,
}

#[derive(ToSchema, Serialize)]
pub struct NewAccommodationDoc {
    pub name: String,
    pub image: String,
    pub location: String,
    pub price: f64,
    #[serde(rename = "isFavorited")]
    pub is_favorited: Option<bool>,
}

#[derive(ToSchema)]
pub struct CreatedDoc { pub message: String, pub id: i32, pub data: AccommodationDoc }

#[derive(ToSchema, Serialize)]
pub struct FavoriteInputDoc {
    #[serde(rename = "isFavorited")]
    pub is_favorited: bool,
}

#[derive(ToSchema, Serialize)]
pub struct FavoriteDoc {
    pub message: String,
    pub id: i32,
    #[serde(rename = "isFavorited")]
    pub is_favorited: bool,
}

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub detail: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::acomodacoes::list,
        crate::routes::acomodacoes::filter,
        crate::routes::acomodacoes::get,
        crate::routes::acomodacoes::create,
        crate::routes::acomodacoes::update_favorite,
    ),
    components(
        schemas(
            HealthResponse,
            AccommodationDoc,
            NewAccommodationDoc,
            CreatedDoc,
            FavoriteInputDoc,
            FavoriteDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "acomodacoes")
    )
)]
pub struct ApiDoc;
