//! HTTP Routes
//!
//! API Endpoints:
//! - /chat             POST  生成带语音与口型的回复
//! - /speech-to-text   POST  语音转文字
//! - /ping             GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/speech-to-text", post(handlers::speech_to_text))
        .route("/ping", get(handlers::ping))
}
