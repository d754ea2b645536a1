//! Speech Synthesis Port - 语音合成抽象

use async_trait::async_trait;
use thiserror::Error;

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SpeechSynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 音色 ID
    pub voice_id: String,
}

/// Speech Synthesis Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 合成语音，返回编码后的音频（mp3）
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, SpeechSynthesisError>;
}
