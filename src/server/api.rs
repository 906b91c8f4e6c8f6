//! Inference HTTP API
//!
//! One route dispatches on the path token: `MEME`, `DeFi` and `NFT` match
//! exactly, anything else is treated as a crypto symbol.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::types::*;
use crate::error::InferenceError;
use crate::service::InferenceService;

/// Create the API router with all endpoints
pub fn create_router(service: Arc<InferenceService>) -> Router {
    Router::new()
        .route("/inference/:token", get(get_inference))
        .route("/health", get(get_health))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ─────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────

/// GET /inference/:token
async fn get_inference(
    Path(token): Path<String>,
    State(service): State<Arc<InferenceService>>,
) -> Response {
    match token.as_str() {
        "MEME" => meme_inference(&service).await,
        "DeFi" => Json(service.defi()).into_response(),
        "NFT" => Json(service.nft()).into_response(),
        _ => crypto_inference(&service, &token).await,
    }
}

async fn crypto_inference(service: &InferenceService, token: &str) -> Response {
    match service.crypto(token).await {
        Ok(agg) => Json(CryptoInferenceResponse::from(agg)).into_response(),
        Err(e) => {
            log_failure(&e, token);
            e.into_response()
        }
    }
}

async fn meme_inference(service: &InferenceService) -> Response {
    match service.meme().await {
        Ok(quote) => plain_price(quote.price).into_response(),
        Err(e) => {
            log_failure(&e, "MEME");
            e.into_response()
        }
    }
}

fn log_failure(err: &InferenceError, token: &str) {
    let stage = err.stage().map(|s| s.as_str()).unwrap_or("config");
    if err.is_client_error() {
        tracing::warn!(token = %token, stage, error = %err, "Inference rejected");
    } else {
        tracing::error!(token = %token, stage, error = %err, "Inference failed");
    }
}

/// GET /health
async fn get_health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}
