//! HTTP request handlers

use crate::{error::ErrorCode, ApiError, AppState};
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use stowage_signer::SignaturePayload;

/// GET /api/signature - Issue a fresh upload signature
pub async fn get_signature(State(state): State<Arc<AppState>>) -> Json<SignaturePayload> {
    let signed = state.signer.sign();
    tracing::debug!("Issued signature for payload {}", signed.payload);
    Json(signed)
}

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}
