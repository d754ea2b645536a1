//! Reply Command Handlers
//!
//! 回复流水线：对话模型 → 逐片段（语音合成 → WAV 转换 → 口型提取）

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::application::commands::{GenerateReply, GenerateReplyResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactKind, ArtifactStorageError, ArtifactStoragePort, AudioTranscoderPort,
    ChatCompletionPort, ChatCompletionRequest, LipSyncError, SpeechSynthesisError,
    SpeechSynthesisPort, SynthesisRequest, TranscodeError, VisemeExtractorPort,
};
use crate::domain::reply::{
    parse_reply_messages, ReplyMessage, ReplySegment, RequestId, ScriptedLine, VisemeTrack,
    GREETING, MISSING_CREDENTIALS, SYSTEM_PROMPT,
};

/// 单个片段的合成错误，只影响该片段
#[derive(Debug, Error)]
pub enum SegmentSynthesisError {
    #[error("speech synthesis failed: {0}")]
    Speech(#[from] SpeechSynthesisError),

    #[error("artifact storage failed: {0}")]
    Storage(#[from] ArtifactStorageError),

    #[error("audio conversion failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("lip sync failed: {0}")]
    LipSync(#[from] LipSyncError),
}

/// 单次迭代结果
#[derive(Debug)]
pub enum SegmentOutcome {
    Realized(ReplySegment),
    Degraded {
        segment: ReplySegment,
        error: SegmentSynthesisError,
    },
}

impl SegmentOutcome {
    pub fn into_segment(self) -> ReplySegment {
        match self {
            SegmentOutcome::Realized(segment) => segment,
            SegmentOutcome::Degraded { segment, .. } => segment,
        }
    }
}

/// 请求临时目录守卫
///
/// 析构时同步删除目录，覆盖请求被取消（客户端断开）时 future 被丢弃的情况
struct ScratchGuard {
    dir: PathBuf,
    armed: bool,
}

impl ScratchGuard {
    fn new(dir: PathBuf, keep_artifacts: bool) -> Self {
        Self {
            dir,
            armed: !keep_artifacts,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if !self.armed || !self.dir.exists() {
            return;
        }
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::warn!(dir = %self.dir.display(), "Removed leftover scratch artifacts"),
            Err(e) => tracing::warn!(
                dir = %self.dir.display(),
                error = %e,
                "Failed to remove leftover scratch artifacts"
            ),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone)]
pub struct ReplyPipelineConfig {
    /// 语音合成使用的音色
    pub voice_id: String,
    /// 缺失的凭据名称；非空时直接返回凭据缺失提示
    pub missing_credentials: Vec<String>,
    /// 是否保留临时产物（调试用）
    pub keep_artifacts: bool,
}

/// 流水线依赖的外部能力
#[derive(Clone)]
pub struct ReplyProviders {
    pub chat: Arc<dyn ChatCompletionPort>,
    pub speech: Arc<dyn SpeechSynthesisPort>,
    pub transcoder: Arc<dyn AudioTranscoderPort>,
    pub lipsync: Arc<dyn VisemeExtractorPort>,
    pub storage: Arc<dyn ArtifactStoragePort>,
}

/// GenerateReply Handler
pub struct GenerateReplyHandler {
    config: ReplyPipelineConfig,
    providers: ReplyProviders,
}

impl GenerateReplyHandler {
    pub fn new(config: ReplyPipelineConfig, providers: ReplyProviders) -> Self {
        if !config.missing_credentials.is_empty() {
            tracing::warn!(
                missing = ?config.missing_credentials,
                "Provider credentials missing, replies will be a canned notice"
            );
        }
        Self { config, providers }
    }

    pub async fn handle(&self, cmd: GenerateReply) -> Result<GenerateReplyResponse, ApplicationError> {
        let request_id = RequestId::new();

        let Some(user_text) = cmd.user_text() else {
            tracing::info!(request_id = %request_id, "Empty message, sending greeting");
            let segments = self.scripted(&GREETING).await;
            return Ok(GenerateReplyResponse { request_id, segments });
        };

        if !self.config.missing_credentials.is_empty() {
            tracing::warn!(
                request_id = %request_id,
                missing = ?self.config.missing_credentials,
                "Cannot generate reply without provider credentials"
            );
            let segments = self.scripted(&[MISSING_CREDENTIALS]).await;
            return Ok(GenerateReplyResponse { request_id, segments });
        }

        let started = Instant::now();

        let content = self
            .providers
            .chat
            .complete(ChatCompletionRequest {
                system_prompt: SYSTEM_PROMPT.to_string(),
                user_message: user_text.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Chat completion failed");
                ApplicationError::from(e)
            })?;

        let messages = parse_reply_messages(&content).map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Unusable chat completion content");
            ApplicationError::from(e)
        })?;

        tracing::info!(
            request_id = %request_id,
            messages = messages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reply content generated"
        );

        let mut scratch = ScratchGuard::new(
            self.providers.storage.request_dir(request_id),
            self.config.keep_artifacts,
        );

        let mut segments = Vec::with_capacity(messages.len());
        for (index, message) in messages.into_iter().enumerate() {
            let outcome = self.process_segment(request_id, index, message).await;
            segments.push(outcome.into_segment());
        }

        if !self.config.keep_artifacts {
            match self.providers.storage.cleanup_request(request_id).await {
                Ok(_) => scratch.disarm(),
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Failed to clean scratch artifacts")
                }
            }
        }

        let degraded = segments.iter().filter(|s| s.is_degraded()).count();
        tracing::info!(
            request_id = %request_id,
            segments = segments.len(),
            degraded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reply ready"
        );

        Ok(GenerateReplyResponse { request_id, segments })
    }

    /// 合成单个片段，失败时降级但不影响其他片段
    async fn process_segment(
        &self,
        request_id: RequestId,
        index: usize,
        message: ReplyMessage,
    ) -> SegmentOutcome {
        match self.synthesize(request_id, index, &message.text).await {
            Ok((audio, lipsync)) => SegmentOutcome::Realized(ReplySegment::realized(message, audio, lipsync)),
            Err(error) => {
                tracing::warn!(
                    request_id = %request_id,
                    index,
                    error = %error,
                    "Segment synthesis failed, using degraded segment"
                );
                SegmentOutcome::Degraded {
                    segment: ReplySegment::degraded(message),
                    error,
                }
            }
        }
    }

    async fn synthesize(
        &self,
        request_id: RequestId,
        index: usize,
        text: &str,
    ) -> Result<(String, VisemeTrack), SegmentSynthesisError> {
        let started = Instant::now();
        let storage = &self.providers.storage;

        let audio = self
            .providers
            .speech
            .synthesize(SynthesisRequest {
                text: text.to_string(),
                voice_id: self.config.voice_id.clone(),
            })
            .await?;

        let audio_path = storage
            .save_artifact(request_id, index, ArtifactKind::SynthesizedAudio, &audio)
            .await?;
        let wav_path = storage.artifact_path(request_id, index, ArtifactKind::Wave);
        let json_path = storage.artifact_path(request_id, index, ArtifactKind::Visemes);

        self.providers
            .transcoder
            .convert_to_wav(&audio_path, &wav_path)
            .await?;
        tracing::debug!(
            request_id = %request_id,
            index,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Conversion done"
        );

        let track = self.providers.lipsync.extract(&wav_path, &json_path).await?;
        tracing::debug!(
            request_id = %request_id,
            index,
            cues = track.mouth_cues.len(),
            duration_secs = track.duration_secs(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Lip sync done"
        );

        Ok((STANDARD.encode(&audio), track))
    }

    async fn scripted(&self, lines: &[ScriptedLine]) -> Vec<ReplySegment> {
        let mut segments = Vec::with_capacity(lines.len());
        for line in lines {
            let media = self.providers.storage.load_clip(line.clip).await;
            segments.push(ReplySegment::new(line.message(), media));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeChat, FakeLipSync, FakeSpeech, FakeTranscoder};
    use crate::domain::reply::{Animation, FacialExpression};
    use crate::infrastructure::adapters::FileArtifactStorage;
    use tempfile::{tempdir, TempDir};

    const THREE_MESSAGES: &str = r#"{"messages": [
        {"text": "first", "facialExpression": "smile", "animation": "Talking_0"},
        {"text": "second", "facialExpression": "surprised", "animation": "Laughing"},
        {"text": "third", "facialExpression": "funnyFace", "animation": "Rumba"}
    ]}"#;

    struct Fixture {
        _dir: TempDir,
        scratch: std::path::PathBuf,
        chat: Arc<FakeChat>,
        speech: Arc<FakeSpeech>,
        transcoder: Arc<FakeTranscoder>,
        lipsync: Arc<FakeLipSync>,
        handler: GenerateReplyHandler,
    }

    async fn fixture_with(
        chat: FakeChat,
        speech: FakeSpeech,
        transcoder: FakeTranscoder,
        lipsync: FakeLipSync,
        missing: &[&str],
        keep_artifacts: bool,
    ) -> Fixture {
        let dir = tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        let assets = dir.path().join("assets");
        let storage = Arc::new(FileArtifactStorage::new(&scratch, &assets).await.unwrap());

        let chat = Arc::new(chat);
        let speech = Arc::new(speech);
        let transcoder = Arc::new(transcoder);
        let lipsync = Arc::new(lipsync);

        let handler = GenerateReplyHandler::new(
            ReplyPipelineConfig {
                voice_id: "voice-1".to_string(),
                missing_credentials: missing.iter().map(|m| m.to_string()).collect(),
                keep_artifacts,
            },
            ReplyProviders {
                chat: chat.clone(),
                speech: speech.clone(),
                transcoder: transcoder.clone(),
                lipsync: lipsync.clone(),
                storage,
            },
        );

        Fixture {
            _dir: dir,
            scratch,
            chat,
            speech,
            transcoder,
            lipsync,
            handler,
        }
    }

    async fn fixture(chat: FakeChat, speech: FakeSpeech) -> Fixture {
        fixture_with(chat, speech, FakeTranscoder::default(), FakeLipSync::default(), &[], false).await
    }

    fn ask(text: &str) -> GenerateReply {
        GenerateReply::new(Some(text.to_string()))
    }

    fn assert_media_invariant(segments: &[ReplySegment]) {
        for s in segments {
            assert!(
                !(s.audio().is_none() && s.lipsync().is_some()),
                "lipsync without audio: {:?}",
                s
            );
        }
    }

    #[tokio::test]
    async fn test_greeting_without_provider_calls() {
        for message in [None, Some(String::new()), Some("   ".to_string())] {
            let fx = fixture(FakeChat::replying(THREE_MESSAGES), FakeSpeech::default()).await;
            let response = fx.handler.handle(GenerateReply::new(message)).await.unwrap();

            assert_eq!(response.segments.len(), 2);
            assert_eq!(response.segments[0].text(), GREETING[0].text);
            assert_eq!(response.segments[0].facial_expression(), FacialExpression::Smile);
            assert_eq!(response.segments[0].animation(), Animation::Talking1);
            assert_eq!(response.segments[1].text(), GREETING[1].text);
            assert_eq!(response.segments[1].animation(), Animation::Crying);

            assert_eq!(fx.chat.calls(), 0);
            assert_eq!(fx.speech.calls(), 0);
            assert_eq!(fx.transcoder.calls(), 0);
            assert_eq!(fx.lipsync.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_greeting_without_assets_has_null_media() {
        let fx = fixture(FakeChat::replying(THREE_MESSAGES), FakeSpeech::default()).await;
        let response = fx.handler.handle(GenerateReply::default()).await.unwrap();

        assert!(response.segments.iter().all(|s| s.audio().is_none()));
        assert_media_invariant(&response.segments);
    }

    #[tokio::test]
    async fn test_missing_credentials_returns_angry_notice() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder::default(),
            FakeLipSync::default(),
            &["speech.api_key"],
            false,
        )
        .await;

        let response = fx.handler.handle(ask("hello")).await.unwrap();

        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].text(), MISSING_CREDENTIALS.text);
        assert_eq!(response.segments[0].facial_expression(), FacialExpression::Angry);
        assert_eq!(response.segments[0].animation(), Animation::Angry);
        assert_eq!(fx.chat.calls(), 0);
        assert_eq!(fx.speech.calls(), 0);
    }

    #[tokio::test]
    async fn test_segments_preserve_order_and_text() {
        let fx = fixture(FakeChat::replying(THREE_MESSAGES), FakeSpeech::default()).await;
        let response = fx.handler.handle(ask("tell me something")).await.unwrap();

        let texts: Vec<_> = response.segments.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(response.segments[1].facial_expression(), FacialExpression::Surprised);
        assert_eq!(response.segments[2].animation(), Animation::Rumba);

        for segment in &response.segments {
            let audio = STANDARD.decode(segment.audio().unwrap()).unwrap();
            assert_eq!(audio, format!("mp3:{}", segment.text()).into_bytes());
            assert_eq!(segment.lipsync(), Some(&FakeLipSync::track()));
        }

        assert_eq!(fx.chat.calls(), 1);
        assert_eq!(fx.speech.calls(), 3);
        assert_eq!(fx.lipsync.calls(), 3);

        let request = fx.chat.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.user_message, "tell me something");
        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_failed_segment_is_isolated() {
        let fx = fixture(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::failing_on(&["second"]),
        )
        .await;
        let response = fx.handler.handle(ask("hi")).await.unwrap();

        assert_eq!(response.segments.len(), 3);

        let failed = &response.segments[1];
        assert_eq!(failed.text(), "second");
        assert!(failed.audio().is_none());
        assert!(failed.lipsync().is_none());
        assert_eq!(failed.facial_expression(), FacialExpression::Sad);
        assert_eq!(failed.animation(), Animation::Terrified);

        for ok in [&response.segments[0], &response.segments[2]] {
            assert!(ok.audio().is_some());
            assert!(ok.lipsync().is_some());
        }
        assert_eq!(response.segments[0].animation(), Animation::Talking0);
        assert_eq!(response.segments[2].facial_expression(), FacialExpression::FunnyFace);

        // 第二段失败后第三段仍然完成合成
        assert_eq!(fx.speech.calls(), 3);
        assert_eq!(fx.lipsync.calls(), 2);
        assert_media_invariant(&response.segments);
    }

    #[tokio::test]
    async fn test_conversion_failure_degrades_every_segment() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder {
                fail: true,
                ..Default::default()
            },
            FakeLipSync::default(),
            &[],
            false,
        )
        .await;
        let response = fx.handler.handle(ask("hi")).await.unwrap();

        assert_eq!(response.segments.len(), 3);
        assert!(response.segments.iter().all(|s| s.is_degraded()));
        assert!(response
            .segments
            .iter()
            .all(|s| s.animation() == Animation::Terrified));
        assert_eq!(fx.lipsync.calls(), 0);
        assert_media_invariant(&response.segments);
    }

    #[tokio::test]
    async fn test_malformed_content_fails_request() {
        let fx = fixture(FakeChat::replying("not json at all"), FakeSpeech::default()).await;
        let err = fx.handler.handle(ask("hi")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamContent(_)));
        assert_eq!(fx.speech.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_error_fails_request() {
        let fx = fixture(FakeChat::failing(), FakeSpeech::default()).await;
        let err = fx.handler.handle(ask("hi")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamContent(_)));
        assert_eq!(fx.speech.calls(), 0);
    }

    #[tokio::test]
    async fn test_scratch_artifacts_removed_after_reply() {
        let fx = fixture(FakeChat::replying(THREE_MESSAGES), FakeSpeech::default()).await;
        let response = fx.handler.handle(ask("hi")).await.unwrap();

        let request_dir = fx.scratch.join(response.request_id.to_string());
        assert!(!request_dir.exists());
    }

    #[tokio::test]
    async fn test_scratch_artifacts_namespaced_per_request() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder::default(),
            FakeLipSync::default(),
            &[],
            true,
        )
        .await;

        let first = fx.handler.handle(ask("one")).await.unwrap();
        let second = fx.handler.handle(ask("two")).await.unwrap();
        assert_ne!(first.request_id, second.request_id);

        for response in [&first, &second] {
            let dir = fx.scratch.join(response.request_id.to_string());
            for ext in ["mp3", "wav", "json"] {
                assert!(dir.join(format!("message_0.{ext}")).exists());
            }
        }
    }

    #[tokio::test]
    async fn test_lipsync_failure_is_isolated() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder::default(),
            FakeLipSync::failing_on_index(1),
            &[],
            false,
        )
        .await;
        let response = fx.handler.handle(ask("hi")).await.unwrap();

        assert_eq!(response.segments.len(), 3);

        let failed = &response.segments[1];
        assert_eq!(failed.text(), "second");
        assert!(failed.audio().is_none());
        assert!(failed.lipsync().is_none());
        assert_eq!(failed.facial_expression(), FacialExpression::Sad);
        assert_eq!(failed.animation(), Animation::Terrified);

        for ok in [&response.segments[0], &response.segments[2]] {
            assert!(ok.audio().is_some());
            assert!(ok.lipsync().is_some());
        }
        assert_eq!(response.segments[2].text(), "third");
        assert_eq!(response.segments[2].animation(), Animation::Rumba);

        assert_eq!(fx.lipsync.calls(), 3);
        assert_media_invariant(&response.segments);
    }

    #[tokio::test]
    async fn test_cancelled_reply_removes_scratch_artifacts() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder {
                stall: true,
                ..Default::default()
            },
            FakeLipSync::default(),
            &[],
            false,
        )
        .await;

        // 客户端断开时 axum 丢弃 handler future
        let result =
            tokio::time::timeout(std::time::Duration::from_millis(200), fx.handler.handle(ask("hi")))
                .await;
        assert!(result.is_err());
        assert_eq!(fx.transcoder.calls(), 1);

        let leftovers: Vec<_> = std::fs::read_dir(&fx.scratch)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert!(leftovers.is_empty(), "leftover scratch dirs: {:?}", leftovers);
    }

    #[tokio::test]
    async fn test_cancelled_reply_keeps_artifacts_when_configured() {
        let fx = fixture_with(
            FakeChat::replying(THREE_MESSAGES),
            FakeSpeech::default(),
            FakeTranscoder {
                stall: true,
                ..Default::default()
            },
            FakeLipSync::default(),
            &[],
            true,
        )
        .await;

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(200), fx.handler.handle(ask("hi")))
                .await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(&fx.scratch).unwrap().count(), 1);
    }
}
