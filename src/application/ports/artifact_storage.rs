//! Artifact Storage Port - 出站端口
//!
//! 定义回复流水线临时产物（音频、转换后的 WAV、口型 JSON）与预录资源的抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::reply::{RequestId, SegmentMedia};

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStorageError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// 产物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// 语音合成输出（mp3）
    SynthesizedAudio,
    /// 口型工具需要的 WAV
    Wave,
    /// 口型工具输出的 JSON
    Visemes,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::SynthesizedAudio => "mp3",
            ArtifactKind::Wave => "wav",
            ArtifactKind::Visemes => "json",
        }
    }
}

/// Artifact Storage Port - 出站端口
///
/// 临时产物按请求隔离：`{scratch}/{request_id}/message_{index}.{ext}`
#[async_trait]
pub trait ArtifactStoragePort: Send + Sync {
    /// 临时目录根路径
    fn scratch_root(&self) -> PathBuf;

    /// 请求的临时目录
    fn request_dir(&self, request_id: RequestId) -> PathBuf;

    /// 产物路径
    fn artifact_path(&self, request_id: RequestId, index: usize, kind: ArtifactKind) -> PathBuf;

    /// 写入产物
    async fn save_artifact(
        &self,
        request_id: RequestId,
        index: usize,
        kind: ArtifactKind,
        data: &[u8],
    ) -> Result<PathBuf, ArtifactStorageError>;

    /// 删除请求的所有产物，返回删除的文件数
    async fn cleanup_request(&self, request_id: RequestId) -> Result<u64, ArtifactStorageError>;

    /// 加载预录台词的音频与口型
    ///
    /// 音频缺失时返回 None（口型随之丢弃）
    async fn load_clip(&self, clip: &str) -> Option<SegmentMedia>;
}
