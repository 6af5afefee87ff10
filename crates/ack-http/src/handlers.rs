use crate::response::ApiSuccess;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;

/// Health check returning the current time.
pub async fn ping() -> impl IntoResponse {
    let pong = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    (StatusCode::OK, Json(ApiSuccess::new(json!({ "pong": pong }))))
}

/// The server's DID document, unwrapped.
pub async fn did_document(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.identity.did_document.clone()))
}
