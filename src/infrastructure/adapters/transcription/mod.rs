//! Transcription Adapter - OpenAI 兼容转写客户端

mod openai_transcription_client;

pub use openai_transcription_client::{OpenAiTranscriptionClient, OpenAiTranscriptionClientConfig};
