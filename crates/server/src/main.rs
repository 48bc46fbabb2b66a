use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::{
    error::ApiError,
    protocol::{HEALTH_ROUTE, QUOTES_ROUTE},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;

/// The only failure text callers ever see; upstream detail stays in the log.
const PROXY_FAILURE_MESSAGE: &str = "Failed to fetch quotes";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    if settings.upstream_api_key.is_none() {
        warn!("NINJA_API_KEY is not set; every quote request will fail");
    }
    let api = ApiContext::new(&settings)?;
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, upstream = %settings.upstream_url, "quote proxy listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(QUOTES_ROUTE, get(http_quotes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Relays the upstream body as-is, keeping its content type.
async fn http_quotes(State(state): State<Arc<AppState>>) -> Response {
    match state.api.fetch_quotes().await {
        Ok(body) => {
            let content_type = body
                .content_type
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));
            ([(header::CONTENT_TYPE, content_type)], body.bytes).into_response()
        }
        Err(err) => {
            error!(error = %err, "upstream quotes request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(PROXY_FAILURE_MESSAGE)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
