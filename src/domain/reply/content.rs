//! 对话模型输出解析
//!
//! 模型被要求返回 JSON 数组；JSON 模式下常见的是 `{"messages": [...]}` 包装，
//! 偶尔只返回单个消息对象，三种形态都接受。

use serde_json::Value;

use super::entities::ReplyMessage;
use super::errors::ReplyContentError;

/// 单次回复最多片段数
pub const MAX_REPLY_MESSAGES: usize = 3;

/// 发送给对话模型的固定指令
pub const SYSTEM_PROMPT: &str = "\
You are a virtual girlfriend.
You will always reply with a JSON array of messages. With a maximum of 3 messages.
Each message has a text, facialExpression, and animation property.
The different facial expressions are: smile, sad, angry, surprised, funnyFace, and default.
The different animations are: Talking_0, Talking_1, Talking_2, Crying, Laughing, Rumba, Idle, Terrified, and Angry.";

/// 解析模型返回的内容为有序消息列表
///
/// 超过 [`MAX_REPLY_MESSAGES`] 的部分被截断
pub fn parse_reply_messages(content: &str) -> Result<Vec<ReplyMessage>, ReplyContentError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| ReplyContentError::InvalidJson(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("messages") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ReplyContentError::InvalidShape(format!(
                    "\"messages\" must be an array, got {}",
                    json_kind(&other)
                )))
            }
            None if obj.contains_key("text") => vec![Value::Object(obj)],
            None => {
                return Err(ReplyContentError::InvalidShape(
                    "object has neither \"messages\" nor \"text\"".to_string(),
                ))
            }
        },
        other => {
            return Err(ReplyContentError::InvalidShape(format!(
                "expected array or object, got {}",
                json_kind(&other)
            )))
        }
    };

    if items.len() > MAX_REPLY_MESSAGES {
        tracing::warn!(
            received = items.len(),
            kept = MAX_REPLY_MESSAGES,
            "Reply has too many messages, truncating"
        );
    }

    items
        .into_iter()
        .take(MAX_REPLY_MESSAGES)
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ReplyMessage>(item).map_err(|e| {
                ReplyContentError::InvalidMessage {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
