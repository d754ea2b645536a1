//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 对话模型调用失败或返回内容无法解析，整条回复不可用
    #[error("Upstream content error: {0}")]
    UpstreamContent(String),

    /// 语音转写失败
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建转写错误
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription(message.into())
    }
}

impl From<crate::application::ports::ChatCompletionError> for ApplicationError {
    fn from(err: crate::application::ports::ChatCompletionError) -> Self {
        Self::UpstreamContent(err.to_string())
    }
}

impl From<crate::domain::reply::ReplyContentError> for ApplicationError {
    fn from(err: crate::domain::reply::ReplyContentError) -> Self {
        Self::UpstreamContent(err.to_string())
    }
}

impl From<crate::application::ports::TranscriptionError> for ApplicationError {
    fn from(err: crate::application::ports::TranscriptionError) -> Self {
        Self::Transcription(err.to_string())
    }
}

impl From<crate::application::ports::ArtifactStorageError> for ApplicationError {
    fn from(err: crate::application::ports::ArtifactStorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}
