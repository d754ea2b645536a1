//! Chat Adapter - OpenAI 兼容对话客户端

mod openai_chat_client;

pub use openai_chat_client::{OpenAiChatClient, OpenAiChatClientConfig};
