//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（对话模型、语音合成、转码、口型、转写、产物存储）
//! - commands: 回复生成与语音转写命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use commands::{
    handlers::{
        GenerateReplyHandler, ReplyPipelineConfig, ReplyProviders, SegmentOutcome,
        SegmentSynthesisError, TranscribeAudioHandler,
    },
    GenerateReply, GenerateReplyResponse, TranscribeAudio,
};

pub use error::ApplicationError;

pub use ports::{
    ArtifactKind, ArtifactStorageError, ArtifactStoragePort, AudioTranscoderPort,
    ChatCompletionError, ChatCompletionPort, ChatCompletionRequest, LipSyncError,
    SpeechSynthesisError, SpeechSynthesisPort, SynthesisRequest, TranscodeError,
    TranscriptionError, TranscriptionPort, VisemeExtractorPort,
};
