//! Rhubarb Extractor - 基于 Rhubarb Lip Sync 命令行的口型提取
//!
//! `rhubarb -f json -o <output.json> <input.wav> -r phonetic`

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::super::process::{run_tool, ProcessError};
use crate::application::ports::{LipSyncError, VisemeExtractorPort};
use crate::domain::reply::VisemeTrack;

/// Rhubarb 配置
#[derive(Debug, Clone)]
pub struct RhubarbConfig {
    /// rhubarb 可执行文件路径
    pub rhubarb_path: PathBuf,
    /// 识别器：phonetic（语言无关）或 pocketSphinx（仅英语）
    pub recognizer: String,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for RhubarbConfig {
    fn default() -> Self {
        Self {
            rhubarb_path: PathBuf::from("rhubarb"),
            recognizer: "phonetic".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Rhubarb 口型提取器
pub struct RhubarbExtractor {
    config: RhubarbConfig,
}

impl RhubarbExtractor {
    pub fn new(config: RhubarbConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, wav: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-f".into(),
            "json".into(),
            "-o".into(),
            output.as_os_str().to_owned(),
            wav.as_os_str().to_owned(),
            "-r".into(),
            self.config.recognizer.clone().into(),
        ]
    }
}

/// 解析 rhubarb 的 JSON 输出
pub fn parse_rhubarb_output(raw: &[u8]) -> Result<VisemeTrack, LipSyncError> {
    let track: VisemeTrack =
        serde_json::from_slice(raw).map_err(|e| LipSyncError::InvalidOutput(e.to_string()))?;

    if !track.is_monotonic() {
        tracing::warn!(cues = track.mouth_cues.len(), "Mouth cues are not in time order");
    }

    Ok(track)
}

#[async_trait]
impl VisemeExtractorPort for RhubarbExtractor {
    async fn extract(&self, wav: &Path, output: &Path) -> Result<VisemeTrack, LipSyncError> {
        run_tool(
            &self.config.rhubarb_path,
            self.build_args(wav, output),
            Duration::from_secs(self.config.timeout_secs),
        )
        .await
        .map_err(|e| match e {
            ProcessError::Spawn { reason, .. } => LipSyncError::Spawn(reason),
            ProcessError::Timeout(secs) => LipSyncError::Timeout(secs),
            ProcessError::Failed { status, stderr } => LipSyncError::Failed { status, stderr },
        })?;

        let raw = tokio::fs::read(output)
            .await
            .map_err(|e| LipSyncError::IoError(format!("{}: {}", output.display(), e)))?;

        parse_rhubarb_output(&raw)
    }
}
