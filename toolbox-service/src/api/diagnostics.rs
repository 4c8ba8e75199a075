//! Liveness and store diagnostics endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::service::Diagnostics;

use super::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET / - liveness message
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "AI Toolbox Backend Running".to_string(),
    })
}

/// GET /test - store connectivity report; always 200
pub async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> Json<Diagnostics> {
    Json(state.service.diagnostics())
}
