//! OpenAI Chat Client - 调用 OpenAI 兼容的对话接口
//!
//! POST {base_url}/chat/completions
//! Request: {"model", "messages", "max_tokens", "temperature", "response_format": {"type": "json_object"}}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ChatCompletionError, ChatCompletionPort, ChatCompletionRequest};

#[derive(Debug, Serialize)]
struct ChatHttpRequest<'a> {
    model: &'a str,
    messages: Vec<ChatHttpMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatHttpMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatHttpResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// 对话客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiChatClientConfig {
    /// 包含 `/v1` 的基础 URL
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo-1106".to_string(),
            max_tokens: 500,
            temperature: 0.6,
            timeout_secs: 60,
        }
    }
}

/// OpenAI 兼容对话客户端
pub struct OpenAiChatClient {
    client: Client,
    config: OpenAiChatClientConfig,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiChatClientConfig) -> Result<Self, ChatCompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatCompletionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatCompletionPort for OpenAiChatClient {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, ChatCompletionError> {
        let body = ChatHttpRequest {
            model: &self.config.model,
            messages: vec![
                ChatHttpMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatHttpMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            user_len = request.user_message.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatCompletionError::Timeout
                } else if e.is_connect() {
                    ChatCompletionError::NetworkError(format!(
                        "Cannot connect to chat service: {}",
                        e
                    ))
                } else {
                    ChatCompletionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatCompletionError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatHttpResponse = response
            .json()
            .await
            .map_err(|e| ChatCompletionError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ChatCompletionError::InvalidResponse("response has no message content".to_string())
            })?;

        tracing::info!(content_len = content.len(), "Chat completion received");

        Ok(content)
    }
}
