//! Audio Transcoder Port - 音频格式转换抽象
//!
//! 口型工具只接受 WAV，语音合成输出需要先转换

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to start transcoder: {0}")]
    Spawn(String),

    #[error("Transcoder timed out after {0}s")]
    Timeout(u64),

    #[error("Transcoder failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 将 `input` 转换为 WAV 写入 `output`（已存在则覆盖）
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}
