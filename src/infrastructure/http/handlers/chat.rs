//! Chat Handler - 回复生成

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::application::GenerateReply;
use crate::infrastructure::http::dto::{ChatRequest, ChatResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const CHAT_FAILURE: &str = "An error occurred while processing your request";

/// 生成回复
///
/// 空请求体等同于 `{}`，返回问候
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let request: ChatRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ChatRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?
    };

    let response = state
        .reply_handler
        .handle(GenerateReply::new(request.message))
        .await
        .map_err(|e| ApiError::from_application(CHAT_FAILURE, e))?;

    Ok(Json(ChatResponse {
        messages: response.segments,
    }))
}
