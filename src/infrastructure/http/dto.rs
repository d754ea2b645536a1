//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::reply::ReplySegment;

// ============================================================================
// Chat DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub messages: Vec<ReplySegment>,
}

// ============================================================================
// Speech DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeechToTextRequest {
    /// data URL，如 `data:audio/webm;base64,...`
    #[serde(rename = "audioData", default)]
    pub audio_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeechToTextResponse {
    pub text: String,
}
