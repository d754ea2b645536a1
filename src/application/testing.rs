//! 测试用端口实现

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    AudioTranscoderPort, ChatCompletionError, ChatCompletionPort, ChatCompletionRequest,
    LipSyncError, SpeechSynthesisError, SpeechSynthesisPort, SynthesisRequest, TranscodeError,
    TranscriptionError, TranscriptionPort, VisemeExtractorPort,
};
use crate::domain::reply::{MouthCue, VisemeTrack};

/// 返回固定内容的对话模型
pub struct FakeChat {
    content: Option<String>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<ChatCompletionRequest>>,
}

impl FakeChat {
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            content: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletionPort for FakeChat {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, ChatCompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        self.content
            .clone()
            .ok_or_else(|| ChatCompletionError::ServiceError("HTTP 500: boom".to_string()))
    }
}

/// 对指定文本失败的语音合成
#[derive(Default)]
pub struct FakeSpeech {
    fail_on: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeSpeech {
    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            fail_on: texts.iter().map(|t| t.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeSpeech {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, SpeechSynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&request.text) {
            return Err(SpeechSynthesisError::ServiceError("HTTP 429: quota".to_string()));
        }
        Ok(format!("mp3:{}", request.text).into_bytes())
    }
}

/// 直接复制文件的转码器
#[derive(Default)]
pub struct FakeTranscoder {
    pub fail: bool,
    /// 永不返回，模拟卡住的 ffmpeg
    pub stall: bool,
    pub calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioTranscoderPort for FakeTranscoder {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stall {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }
        if self.fail {
            return Err(TranscodeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| TranscodeError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// 写出固定口型轨道的口型工具
#[derive(Default)]
pub struct FakeLipSync {
    /// 对 `message_{i}.wav` 失败
    pub fail_on_index: Option<usize>,
    pub calls: AtomicUsize,
}

impl FakeLipSync {
    pub fn failing_on_index(index: usize) -> Self {
        Self {
            fail_on_index: Some(index),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn track() -> VisemeTrack {
        VisemeTrack {
            metadata: serde_json::json!({ "duration": 0.4 }),
            mouth_cues: vec![
                MouthCue { start: 0.0, end: 0.1, value: "X".into() },
                MouthCue { start: 0.1, end: 0.4, value: "C".into() },
            ],
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisemeExtractorPort for FakeLipSync {
    async fn extract(&self, wav: &Path, output: &Path) -> Result<VisemeTrack, LipSyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !wav.exists() {
            return Err(LipSyncError::IoError(format!("missing {}", wav.display())));
        }
        if let Some(index) = self.fail_on_index {
            let target = format!("message_{}.wav", index);
            if wav.file_name().is_some_and(|name| name == target.as_str()) {
                return Err(LipSyncError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "Error processing file".to_string(),
                });
            }
        }
        let track = Self::track();
        let json = serde_json::to_vec(&track).map_err(|e| LipSyncError::InvalidOutput(e.to_string()))?;
        tokio::fs::write(output, json)
            .await
            .map_err(|e| LipSyncError::IoError(e.to_string()))?;
        Ok(track)
    }
}

/// 返回固定文本的转写服务，记录调用时文件是否存在
pub struct FakeTranscription {
    text: Option<String>,
    pub file_existed: AtomicBool,
    pub last_path: Mutex<Option<PathBuf>>,
    pub last_mime: Mutex<Option<String>>,
}

impl FakeTranscription {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_existed: AtomicBool::new(false),
            last_path: Mutex::new(None),
            last_mime: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            file_existed: AtomicBool::new(false),
            last_path: Mutex::new(None),
            last_mime: Mutex::new(None),
        }
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionPort for FakeTranscription {
    async fn transcribe(&self, audio: &Path, mime: &str) -> Result<String, TranscriptionError> {
        self.file_existed.store(audio.exists(), Ordering::SeqCst);
        *self.last_path.lock().unwrap() = Some(audio.to_path_buf());
        *self.last_mime.lock().unwrap() = Some(mime.to_string());
        self.text
            .clone()
            .ok_or_else(|| TranscriptionError::ServiceError("HTTP 400: bad audio".to_string()))
    }
}
