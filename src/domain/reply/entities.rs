//! Reply Context - Entities

use serde::{Deserialize, Serialize};

use super::value_objects::{Animation, FacialExpression};

/// 单个口型提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouthCue {
    pub start: f64,
    pub end: f64,
    pub value: String,
}

/// 口型轨道
///
/// 与口型工具的 JSON 输出一致，原样透传给前端
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisemeTrack {
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub mouth_cues: Vec<MouthCue>,
}

impl VisemeTrack {
    /// 时间是否单调不减，且每个提示 start <= end
    pub fn is_monotonic(&self) -> bool {
        self.mouth_cues.iter().all(|c| c.start <= c.end)
            && self
                .mouth_cues
                .windows(2)
                .all(|w| w[0].start <= w[1].start && w[0].end <= w[1].end)
    }

    pub fn duration_secs(&self) -> f64 {
        self.mouth_cues.last().map(|c| c.end).unwrap_or(0.0)
    }
}

/// 对话模型返回的一条回复内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessage {
    pub text: String,
    #[serde(default)]
    pub facial_expression: FacialExpression,
    #[serde(default)]
    pub animation: Animation,
}

impl ReplyMessage {
    pub fn new(
        text: impl Into<String>,
        facial_expression: FacialExpression,
        animation: Animation,
    ) -> Self {
        Self {
            text: text.into(),
            facial_expression,
            animation,
        }
    }
}

/// 合成好的媒体：音频与口型必须成对出现
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMedia {
    /// base64 编码的音频
    pub audio: String,
    /// 口型轨道（音频存在时仍可能缺失）
    pub lipsync: Option<VisemeTrack>,
}

/// 回复片段 - 前端播放单元
///
/// 字段私有，只能通过构造函数创建，保证 `audio == null` 时 `lipsync == null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySegment {
    text: String,
    facial_expression: FacialExpression,
    animation: Animation,
    audio: Option<String>,
    lipsync: Option<VisemeTrack>,
}

impl ReplySegment {
    /// 带媒体（或不带）的片段，保留原始表情与动画
    pub fn new(message: ReplyMessage, media: Option<SegmentMedia>) -> Self {
        let (audio, lipsync) = match media {
            Some(m) => (Some(m.audio), m.lipsync),
            None => (None, None),
        };
        Self {
            text: message.text,
            facial_expression: message.facial_expression,
            animation: message.animation,
            audio,
            lipsync,
        }
    }

    /// 合成成功的片段
    pub fn realized(message: ReplyMessage, audio: String, lipsync: VisemeTrack) -> Self {
        Self::new(
            message,
            Some(SegmentMedia {
                audio,
                lipsync: Some(lipsync),
            }),
        )
    }

    /// 合成失败的降级片段：保留文本，切换为 sad / Terrified
    pub fn degraded(message: ReplyMessage) -> Self {
        Self {
            text: message.text,
            facial_expression: FacialExpression::Sad,
            animation: Animation::Terrified,
            audio: None,
            lipsync: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn facial_expression(&self) -> FacialExpression {
        self.facial_expression
    }

    pub fn animation(&self) -> Animation {
        self.animation
    }

    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    pub fn lipsync(&self) -> Option<&VisemeTrack> {
        self.lipsync.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.audio.is_none()
    }
}
