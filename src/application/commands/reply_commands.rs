//! Reply Commands - 回复生成命令

use crate::domain::reply::{ReplySegment, RequestId};

/// 生成回复命令
#[derive(Debug, Clone, Default)]
pub struct GenerateReply {
    /// 用户输入；为空时返回固定问候
    pub message: Option<String>,
}

impl GenerateReply {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    /// 去除首尾空白后的有效输入
    pub fn user_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// 生成回复响应
#[derive(Debug, Clone)]
pub struct GenerateReplyResponse {
    pub request_id: RequestId,
    pub segments: Vec<ReplySegment>,
}
