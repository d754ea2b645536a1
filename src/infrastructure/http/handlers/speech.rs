//! Speech Handler - 语音转写

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::TranscribeAudio;
use crate::infrastructure::http::dto::{SpeechToTextRequest, SpeechToTextResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const SPEECH_FAILURE: &str = "An error occurred while processing your audio";

/// 语音转文字
pub async fn speech_to_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechToTextRequest>, JsonRejection>,
) -> Result<Json<SpeechToTextResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let audio_data = request
        .audio_data
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No audio data provided".to_string()))?;

    let command = TranscribeAudio::from_data_url(&audio_data)
        .map_err(|e| ApiError::from_application(SPEECH_FAILURE, e))?;

    let text = state
        .transcribe_handler
        .handle(command)
        .await
        .map_err(|e| ApiError::from_application(SPEECH_FAILURE, e))?;

    Ok(Json(SpeechToTextResponse { text }))
}
