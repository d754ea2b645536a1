//! Chat Completion Port - 对话模型抽象
//!
//! 定义对话生成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 对话生成错误
#[derive(Debug, Error)]
pub enum ChatCompletionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 对话生成请求
#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    /// 固定系统指令
    pub system_prompt: String,
    /// 用户输入
    pub user_message: String,
}

/// Chat Completion Port
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    /// 生成回复，返回模型输出的原始文本（期望为 JSON）
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, ChatCompletionError>;
}
