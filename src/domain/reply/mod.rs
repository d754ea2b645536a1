//! Reply Context - 回复限界上下文
//!
//! 职责:
//! - 回复片段 (ReplySegment) 及其音频/口型不变量
//! - 对话模型输出的解析
//! - 固定台词（问候、凭据缺失提示）

mod content;
mod entities;
mod errors;
mod scripted;
mod value_objects;

pub use content::{parse_reply_messages, MAX_REPLY_MESSAGES, SYSTEM_PROMPT};
pub use entities::{MouthCue, ReplyMessage, ReplySegment, SegmentMedia, VisemeTrack};
pub use errors::ReplyContentError;
pub use scripted::{ScriptedLine, GREETING, MISSING_CREDENTIALS};
pub use value_objects::{Animation, FacialExpression, RequestId};
