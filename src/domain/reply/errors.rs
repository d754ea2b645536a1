//! Reply Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplyContentError {
    #[error("回复内容不是合法 JSON: {0}")]
    InvalidJson(String),

    #[error("回复内容结构无效: {0}")]
    InvalidShape(String),

    #[error("回复消息无效 (index {index}): {reason}")]
    InvalidMessage { index: usize, reason: String },
}
