//! Admin assistant endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub submissions_considered: usize,
}

/// POST /api/admin/chat
async fn admin_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    let answer = state.insights.answer(&req.message).await?;

    Ok(Json(ChatResponse {
        success: true,
        response: answer.response,
        submissions_considered: answer.submissions_considered,
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/admin/chat", post(admin_chat))
}
