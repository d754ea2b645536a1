//! Viseme Extractor Port - 口型提取抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::reply::VisemeTrack;

/// 口型提取错误
#[derive(Debug, Error)]
pub enum LipSyncError {
    #[error("Failed to start lip-sync tool: {0}")]
    Spawn(String),

    #[error("Lip-sync tool timed out after {0}s")]
    Timeout(u64),

    #[error("Lip-sync tool failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Invalid lip-sync output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Viseme Extractor Port
#[async_trait]
pub trait VisemeExtractorPort: Send + Sync {
    /// 对 WAV 音频做口型分析，JSON 结果写入 `output` 并解析返回
    async fn extract(&self, wav: &Path, output: &Path) -> Result<VisemeTrack, LipSyncError>;
}
