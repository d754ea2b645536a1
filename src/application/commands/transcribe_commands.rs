//! Transcribe Commands - 语音转写命令

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::application::error::ApplicationError;

/// 转写命令
#[derive(Debug, Clone)]
pub struct TranscribeAudio {
    /// 原始音频字节
    pub audio: Vec<u8>,
    /// 内容类型，如 `audio/webm`
    pub mime_hint: Option<String>,
}

impl TranscribeAudio {
    /// 从 data URL 解析（`data:audio/webm;codecs=opus;base64,AAAA`）
    ///
    /// 不含逗号时按纯 base64 处理
    pub fn from_data_url(data_url: &str) -> Result<Self, ApplicationError> {
        let (mime_hint, payload) = match data_url.split_once(',') {
            Some((header, payload)) => (parse_mime(header), payload),
            None => (None, data_url),
        };

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(ApplicationError::validation("No audio data provided"));
        }

        let audio = STANDARD
            .decode(payload)
            .map_err(|e| ApplicationError::validation(format!("Invalid base64 audio: {}", e)))?;

        if audio.is_empty() {
            return Err(ApplicationError::validation("No audio data provided"));
        }

        Ok(Self { audio, mime_hint })
    }

    /// 上传时使用的内容类型
    pub fn mime(&self) -> &str {
        self.mime_hint.as_deref().unwrap_or("audio/mpeg")
    }

    /// 临时文件扩展名，转写服务按扩展名识别格式
    pub fn file_extension(&self) -> &'static str {
        let mime = self.mime();
        let subtype = mime.rsplit('/').next().unwrap_or(mime);
        match subtype.to_ascii_lowercase().as_str() {
            "webm" => "webm",
            "wav" | "wave" | "x-wav" => "wav",
            "ogg" => "ogg",
            "mp4" | "m4a" | "x-m4a" => "m4a",
            _ => "mp3",
        }
    }
}

fn parse_mime(header: &str) -> Option<String> {
    let mime = header
        .strip_prefix("data:")?
        .split(';')
        .next()?
        .trim();
    (!mime.is_empty()).then(|| mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_with_codecs() {
        let cmd = TranscribeAudio::from_data_url("data:audio/webm;codecs=opus;base64,aGVsbG8=").unwrap();
        assert_eq!(cmd.audio, b"hello");
        assert_eq!(cmd.mime(), "audio/webm");
        assert_eq!(cmd.file_extension(), "webm");
    }

    #[test]
    fn test_raw_base64_defaults_to_mp3() {
        let cmd = TranscribeAudio::from_data_url("aGVsbG8=").unwrap();
        assert!(cmd.mime_hint.is_none());
        assert_eq!(cmd.mime(), "audio/mpeg");
        assert_eq!(cmd.file_extension(), "mp3");
    }

    #[test]
    fn test_extension_for_common_types() {
        let ext = |mime: &str| TranscribeAudio {
            audio: vec![1],
            mime_hint: Some(mime.to_string()),
        }
        .file_extension();

        assert_eq!(ext("audio/wav"), "wav");
        assert_eq!(ext("audio/x-wav"), "wav");
        assert_eq!(ext("audio/ogg"), "ogg");
        assert_eq!(ext("audio/mp4"), "m4a");
        assert_eq!(ext("audio/mpeg"), "mp3");
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = TranscribeAudio::from_data_url("data:audio/webm;base64,").unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = TranscribeAudio::from_data_url("data:audio/webm;base64,@@@").unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
