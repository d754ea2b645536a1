//! Transcription Port - 语音转写抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 转写错误
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Transcription Port
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// 转写音频文件，`mime` 为上传时使用的内容类型
    async fn transcribe(&self, audio: &Path, mime: &str) -> Result<String, TranscriptionError>;
}
