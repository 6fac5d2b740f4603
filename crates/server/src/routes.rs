pub mod acomodacoes;

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use common::types::Health;
use service::accommodation::AccommodationService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

/// Shared handler state: the query service over whichever backend was configured.
#[derive(Clone)]
pub struct ServerState {
    pub accommodations: AccommodationService,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health { status: "ok", backend: state.accommodations.backend().to_string() })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/acomodacoes", get(acomodacoes::list).post(acomodacoes::create))
        .route("/acomodacoes/filtrar", get(acomodacoes::filter))
        .route("/acomodacoes/:id", get(acomodacoes::get))
        .route("/acomodacoes/:id/favoritar", patch(acomodacoes::update_favorite));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are reported at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
