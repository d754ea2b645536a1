//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_storage;
mod audio_transcoder;
mod chat_completion;
mod speech_synthesis;
mod transcription;
mod viseme_extractor;

pub use artifact_storage::{ArtifactKind, ArtifactStorageError, ArtifactStoragePort};
pub use audio_transcoder::{AudioTranscoderPort, TranscodeError};
pub use chat_completion::{ChatCompletionError, ChatCompletionPort, ChatCompletionRequest};
pub use speech_synthesis::{SpeechSynthesisError, SpeechSynthesisPort, SynthesisRequest};
pub use transcription::{TranscriptionError, TranscriptionPort};
pub use viseme_extractor::{LipSyncError, VisemeExtractorPort};
