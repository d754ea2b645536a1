//! Companion - 虚拟伴侣后端
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Reply: 回复片段、表情与动作词表、预录台词
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ChatCompletion, SpeechSynthesis, AudioTranscoder,
//!   VisemeExtractor, Transcription, ArtifactStorage）
//! - Commands: 回复生成与语音转写处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: OpenAI/ElevenLabs 客户端, ffmpeg, rhubarb, 文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
