//! Liveness endpoint

use axum::{Json, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

/// GET /health
///
/// Answers as soon as the listener is up. The news, comments and
/// verification services are never consulted, so an outage there does not
/// take the gateway out of rotation.
pub async fn liveness() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn health_router() -> axum::Router<Arc<AppState>> {
    axum::Router::new().route("/health", axum::routing::get(liveness))
}
