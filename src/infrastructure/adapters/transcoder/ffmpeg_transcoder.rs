//! FFmpeg Transcoder - 基于 ffmpeg 命令行的格式转换
//!
//! `ffmpeg -y -i <input> <output>`，输出格式由扩展名决定

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::super::process::{run_tool, ProcessError};
use crate::application::ports::{AudioTranscoderPort, TranscodeError};

/// FFmpeg 转码器配置
#[derive(Debug, Clone)]
pub struct FfmpegTranscoderConfig {
    /// ffmpeg 可执行文件路径
    pub ffmpeg_path: PathBuf,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for FfmpegTranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout_secs: 60,
        }
    }
}

/// FFmpeg 转码器
pub struct FfmpegTranscoder {
    config: FfmpegTranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: FfmpegTranscoderConfig) -> Self {
        Self { config }
    }

    fn build_args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl AudioTranscoderPort for FfmpegTranscoder {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        if !input.exists() {
            return Err(TranscodeError::IoError(format!(
                "input not found: {}",
                input.display()
            )));
        }

        run_tool(
            &self.config.ffmpeg_path,
            Self::build_args(input, output),
            Duration::from_secs(self.config.timeout_secs),
        )
        .await
        .map_err(|e| match e {
            ProcessError::Spawn { reason, .. } => TranscodeError::Spawn(reason),
            ProcessError::Timeout(secs) => TranscodeError::Timeout(secs),
            ProcessError::Failed { status, stderr } => TranscodeError::Failed { status, stderr },
        })?;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Audio converted to wav"
        );

        Ok(())
    }
}
