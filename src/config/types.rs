//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 视为"未配置"的占位凭据
const PLACEHOLDER_SECRETS: &[&str] = &["", "-"];

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 对话模型配置
    #[serde(default)]
    pub chat: ChatConfig,

    /// 语音合成配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 语音转写配置
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// 转码与口型工具配置
    #[serde(default)]
    pub lipsync: LipSyncConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 缺失的提供方凭据
    pub fn missing_credentials(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if is_placeholder(&self.chat.api_key) {
            missing.push("chat.api_key".to_string());
        }
        if is_placeholder(&self.speech.api_key) {
            missing.push("speech.api_key".to_string());
        }
        missing
    }

    /// 转写使用的 API key，未单独配置时沿用对话模型的
    pub fn transcription_api_key(&self) -> &str {
        if is_placeholder(&self.transcription.api_key) {
            &self.chat.api_key
        } else {
            &self.transcription.api_key
        }
    }

    /// 转写服务地址，未单独配置时沿用对话模型的
    pub fn transcription_base_url(&self) -> &str {
        self.transcription
            .base_url
            .as_deref()
            .unwrap_or(&self.chat.base_url)
    }
}

fn is_placeholder(secret: &str) -> bool {
    PLACEHOLDER_SECRETS.contains(&secret.trim())
}

/// 打印用的脱敏凭据
pub fn mask_secret(secret: &str) -> String {
    if is_placeholder(secret) {
        return "<unset>".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置（托管前端构建产物）
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 对话模型配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub api_key: String,

    /// 包含 `/v1` 的基础 URL
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// 请求超时时间（秒）
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo-1106".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.6
}

fn default_http_timeout() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_url(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_http_timeout(),
        }
    }
}

/// 语音合成配置（ElevenLabs 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_speech_url")]
    pub base_url: String,

    /// 音色 ID
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_speech_model")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_speech_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_speech_model() -> String {
    "eleven_multilingual_v2".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_speech_url(),
            voice_id: default_voice_id(),
            model_id: default_speech_model(),
            timeout_secs: default_http_timeout(),
        }
    }
}

/// 语音转写配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// 为空时沿用 chat.api_key
    #[serde(default)]
    pub api_key: String,

    /// 为空时沿用 chat.base_url
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: default_transcription_model(),
            timeout_secs: default_http_timeout(),
        }
    }
}

/// 转码（ffmpeg）与口型工具（rhubarb）配置
#[derive(Debug, Clone, Deserialize)]
pub struct LipSyncConfig {
    /// ffmpeg 可执行文件路径
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// rhubarb 可执行文件路径
    #[serde(default = "default_rhubarb_path")]
    pub rhubarb_path: PathBuf,

    /// 口型识别器：phonetic 或 pocketSphinx
    #[serde(default = "default_recognizer")]
    pub recognizer: String,

    /// 单次子进程超时（秒）
    #[serde(default = "default_process_timeout")]
    pub timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_rhubarb_path() -> PathBuf {
    PathBuf::from("rhubarb")
}

fn default_recognizer() -> String {
    "phonetic".to_string()
}

fn default_process_timeout() -> u64 {
    60
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            rhubarb_path: default_rhubarb_path(),
            recognizer: default_recognizer(),
            timeout_secs: default_process_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 临时产物目录（按请求划分子目录）
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// 预录台词目录（intro_0、intro_1、api_0 的 .wav/.json）
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// 保留临时产物（调试用）
    #[serde(default)]
    pub keep_artifacts: bool,

    /// 请求体最大大小（字节），默认 25MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("audios/tmp")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("audios")
}

fn default_max_upload_size() -> usize {
    25 * 1024 * 1024 // 25 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            assets_dir: default_assets_dir(),
            keep_artifacts: false,
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
