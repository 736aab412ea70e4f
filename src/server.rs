use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::{EngagementContext, PredictionResult, RawTweetRequest};

#[derive(Clone)]
struct AppState {
    context: Arc<EngagementContext>,
}

pub fn router(context: Arc<EngagementContext>) -> Router {
    let state = AppState { context };
    Router::new()
        .route("/api/health", get(health))
        .route("/generate", post(generate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(context: Arc<EngagementContext>, host: &str, port: u16) -> Result<(), String> {
    let app = router(context);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<RawTweetRequest>,
) -> Json<PredictionResult> {
    Json(state.context.respond_raw(request))
}
