//! 固定台词
//!
//! 配合资源目录中预录的 `{clip}.wav` / `{clip}.json` 使用

use super::entities::ReplyMessage;
use super::value_objects::{Animation, FacialExpression};

/// 一句预录台词
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedLine {
    /// 资源文件名（不含扩展名）
    pub clip: &'static str,
    pub text: &'static str,
    pub facial_expression: FacialExpression,
    pub animation: Animation,
}

impl ScriptedLine {
    pub fn message(&self) -> ReplyMessage {
        ReplyMessage::new(self.text, self.facial_expression, self.animation)
    }
}

/// 首次对话问候
pub const GREETING: [ScriptedLine; 2] = [
    ScriptedLine {
        clip: "intro_0",
        text: "Hey dear... How was your day?",
        facial_expression: FacialExpression::Smile,
        animation: Animation::Talking1,
    },
    ScriptedLine {
        clip: "intro_1",
        text: "I missed you so much... Please don't go for so long!",
        facial_expression: FacialExpression::Sad,
        animation: Animation::Crying,
    },
];

/// 凭据缺失提示
pub const MISSING_CREDENTIALS: ScriptedLine = ScriptedLine {
    clip: "api_0",
    text: "API keys are missing! Please configure them.",
    facial_expression: FacialExpression::Angry,
    animation: Animation::Angry,
};
