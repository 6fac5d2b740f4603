use std::{future::Future, net::SocketAddr};

use axum::{http::HeaderValue, Router};
use configs::AppConfig;
use service::{accommodation::AccommodationService, runtime};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Allow-listed origins with credentials; methods and headers mirror the request.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let allowed = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| StartupError::InvalidConfig(format!("cors origin `{o}`: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address `{raw}`: {e}")))
}

/// Open the configured store and assemble the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = runtime::open_store(cfg).await?;
    let state = ServerState { accommodations: AccommodationService::new(store) };
    let cors = build_cors(&cfg.server.cors_origins)?;
    Ok(routes::build_router(state, cors))
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Bind(format!("{addr}: {e}")))?;
    info!(%addr, backend = cfg.storage.backend.as_str(), "accommodation server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    serve(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    })
    .await
}
