//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量（`COMPANION_` 前缀）
//! 2. 配置文件（config.toml）
//! 3. 旧版环境变量（`OPENAI_API_KEY` 等）
//! 4. 默认值

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{mask_secret, AppConfig};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 旧版环境变量与配置键的对应关系
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "chat.api_key"),
    ("ELEVEN_LABS_API_KEY", "speech.api_key"),
    ("VOICE_ID", "speech.voice_id"),
    ("FfmpegPath", "lipsync.ffmpeg_path"),
    ("RhubarbPath", "lipsync.rhubarb_path"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `COMPANION_SERVER__PORT=3000`
/// - `COMPANION_CHAT__API_KEY=sk-...`
/// - `COMPANION_SPEECH__VOICE_ID=...`
/// - `COMPANION_LIPSYNC__RHUBARB_PATH=/opt/rhubarb/rhubarb`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = default_builder(&|name| std::env::var(name).ok())?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符: __ (双下划线)，例如 COMPANION_CHAT__MODEL=gpt-4o-mini
    builder = builder.add_source(
        Environment::with_prefix("COMPANION")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    build(builder)
}

/// 默认值 + 旧版环境变量
fn default_builder(
    legacy_env: &dyn Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("chat.base_url", "https://api.openai.com/v1")?
        .set_default("chat.model", "gpt-3.5-turbo-1106")?
        .set_default("chat.max_tokens", 500)?
        .set_default("chat.temperature", 0.6)?
        .set_default("chat.timeout_secs", 60)?
        .set_default("speech.base_url", "https://api.elevenlabs.io")?
        .set_default("speech.timeout_secs", 60)?
        .set_default("transcription.model", "whisper-1")?
        .set_default("transcription.timeout_secs", 60)?
        .set_default("lipsync.ffmpeg_path", "ffmpeg")?
        .set_default("lipsync.rhubarb_path", "rhubarb")?
        .set_default("lipsync.recognizer", "phonetic")?
        .set_default("lipsync.timeout_secs", 60)?
        .set_default("storage.scratch_dir", "audios/tmp")?
        .set_default("storage.assets_dir", "audios")?
        .set_default("storage.keep_artifacts", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    for (env_name, key) in LEGACY_ENV_KEYS {
        if let Some(value) = legacy_env(env_name).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_default(*key, value)?;
        }
    }

    Ok(builder)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.chat.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Chat base URL cannot be empty".to_string(),
        ));
    }

    if config.speech.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Speech base URL cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.chat.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "Chat temperature must be within 0.0..=2.0, got {}",
            config.chat.temperature
        )));
    }

    if config.lipsync.ffmpeg_path.as_os_str().is_empty()
        || config.lipsync.rhubarb_path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "ffmpeg and rhubarb paths cannot be empty".to_string(),
        ));
    }

    let timeouts = [
        ("chat", config.chat.timeout_secs),
        ("speech", config.speech.timeout_secs),
        ("transcription", config.transcription.timeout_secs),
        ("lipsync", config.lipsync.timeout_secs),
    ];
    if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
        return Err(ConfigError::ValidationError(format!(
            "{} timeout cannot be 0",
            name
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Chat: {} @ {}", config.chat.model, config.chat.base_url);
    tracing::info!("Chat API Key: {}", mask_secret(&config.chat.api_key));
    tracing::info!("Speech: voice {} @ {}", config.speech.voice_id, config.speech.base_url);
    tracing::info!("Speech API Key: {}", mask_secret(&config.speech.api_key));
    tracing::info!(
        "Transcription: {} @ {}",
        config.transcription.model,
        config.transcription_base_url()
    );
    tracing::info!("FFmpeg: {:?}", config.lipsync.ffmpeg_path);
    tracing::info!(
        "Rhubarb: {:?} ({})",
        config.lipsync.rhubarb_path,
        config.lipsync.recognizer
    );
    tracing::info!("Scratch Directory: {:?}", config.storage.scratch_dir);
    tracing::info!("Assets Directory: {:?}", config.storage.assets_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
