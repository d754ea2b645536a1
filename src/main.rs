//! Companion - 虚拟伴侣后端
//!
//! 分层结构:
//! - Domain: reply/ (回复片段、表情、动作)
//! - Application: commands, ports
//! - Infrastructure: http, adapters

use std::sync::Arc;

use companion::application::{ReplyPipelineConfig, ReplyProviders};
use companion::config::{load_config, print_config, AppConfig};
use companion::infrastructure::adapters::{
    FfmpegTranscoder, FfmpegTranscoderConfig, FileArtifactStorage, HttpTtsClient,
    HttpTtsClientConfig, OpenAiChatClient, OpenAiChatClientConfig, OpenAiTranscriptionClient,
    OpenAiTranscriptionClientConfig, RhubarbConfig, RhubarbExtractor,
};
use companion::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},companion={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 旧版环境变量 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Companion - virtual companion backend v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 产物存储（创建临时目录）
    let storage = Arc::new(
        FileArtifactStorage::new(&config.storage.scratch_dir, &config.storage.assets_dir).await?,
    );

    // 对话模型
    let chat = Arc::new(OpenAiChatClient::new(OpenAiChatClientConfig {
        base_url: config.chat.base_url.clone(),
        api_key: config.chat.api_key.clone(),
        model: config.chat.model.clone(),
        max_tokens: config.chat.max_tokens,
        temperature: config.chat.temperature,
        timeout_secs: config.chat.timeout_secs,
    })?);

    // 语音合成
    let speech = Arc::new(HttpTtsClient::new(HttpTtsClientConfig {
        base_url: config.speech.base_url.clone(),
        api_key: config.speech.api_key.clone(),
        model_id: config.speech.model_id.clone(),
        timeout_secs: config.speech.timeout_secs,
    })?);

    // 外部工具：ffmpeg 与 rhubarb
    let transcoder = Arc::new(FfmpegTranscoder::new(FfmpegTranscoderConfig {
        ffmpeg_path: config.lipsync.ffmpeg_path.clone(),
        timeout_secs: config.lipsync.timeout_secs,
    }));
    let lipsync = Arc::new(RhubarbExtractor::new(RhubarbConfig {
        rhubarb_path: config.lipsync.rhubarb_path.clone(),
        recognizer: config.lipsync.recognizer.clone(),
        timeout_secs: config.lipsync.timeout_secs,
    }));

    // 语音转写
    let transcriber = Arc::new(OpenAiTranscriptionClient::new(
        OpenAiTranscriptionClientConfig {
            base_url: config.transcription_base_url().to_string(),
            api_key: config.transcription_api_key().to_string(),
            model: config.transcription.model.clone(),
            timeout_secs: config.transcription.timeout_secs,
        },
    )?);

    let pipeline = ReplyPipelineConfig {
        voice_id: config.speech.voice_id.clone(),
        missing_credentials: config.missing_credentials(),
        keep_artifacts: config.storage.keep_artifacts,
    };
    let providers = ReplyProviders {
        chat,
        speech,
        transcoder,
        lipsync,
        storage,
    };
    let state = AppState::new(pipeline, providers, transcriber);

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_body_limit(config.storage.max_upload_size);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(config.server.static_files.dir.clone());
    }

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
