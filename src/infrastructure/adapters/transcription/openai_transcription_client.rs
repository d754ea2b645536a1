//! OpenAI Transcription Client - 调用 OpenAI 兼容的语音转写接口
//!
//! POST {base_url}/audio/transcriptions  (multipart: file, model)
//! Response: {"text": "..."}

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{TranscriptionError, TranscriptionPort};

#[derive(Debug, Deserialize)]
struct TranscriptionHttpResponse {
    text: Option<String>,
}

/// 转写客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiTranscriptionClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiTranscriptionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "whisper-1".to_string(),
            timeout_secs: 60,
        }
    }
}

/// OpenAI 兼容转写客户端
pub struct OpenAiTranscriptionClient {
    client: Client,
    config: OpenAiTranscriptionClientConfig,
}

impl OpenAiTranscriptionClient {
    pub fn new(config: OpenAiTranscriptionClientConfig) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranscriptionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn transcriptions_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TranscriptionPort for OpenAiTranscriptionClient {
    async fn transcribe(&self, audio: &Path, mime: &str) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|e| TranscriptionError::IoError(format!("{}: {}", audio.display(), e)))?;

        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "speech.mp3".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| TranscriptionError::IoError(format!("invalid mime {}: {}", mime, e)))?;

        let form = multipart::Form::new()
            .text("model", self.config.model.clone())
            .part("file", part);

        tracing::debug!(url = %self.transcriptions_url(), mime = %mime, "Sending transcription request");

        let response = self
            .client
            .post(self.transcriptions_url())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else {
                    TranscriptionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: TranscriptionHttpResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        parsed
            .text
            .ok_or_else(|| TranscriptionError::InvalidResponse("response has no text".to_string()))
    }
}
