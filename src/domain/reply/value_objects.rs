//! Reply Context - Value Objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 请求唯一标识（用于临时文件命名空间与日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 面部表情
///
/// 未知名称或非字符串值宽松映射为 `Default`，模型偶尔会输出列表之外的表情
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FacialExpression {
    #[serde(rename = "smile")]
    Smile,
    #[serde(rename = "sad")]
    Sad,
    #[serde(rename = "angry")]
    Angry,
    #[serde(rename = "surprised")]
    Surprised,
    #[serde(rename = "funnyFace")]
    FunnyFace,
    #[default]
    #[serde(rename = "default")]
    Default,
}

impl FacialExpression {
    pub const ALL: [FacialExpression; 6] = [
        Self::Smile,
        Self::Sad,
        Self::Angry,
        Self::Surprised,
        Self::FunnyFace,
        Self::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::FunnyFace => "funnyFace",
            Self::Default => "default",
        }
    }

    /// 按名称解析，不区分大小写
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for FacialExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FacialExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Self::from_name).unwrap_or_default())
    }
}

/// 角色动画
///
/// 未知名称或非字符串值宽松映射为 `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Animation {
    #[serde(rename = "Talking_0")]
    Talking0,
    #[serde(rename = "Talking_1")]
    Talking1,
    #[serde(rename = "Talking_2")]
    Talking2,
    Crying,
    Laughing,
    Rumba,
    #[default]
    Idle,
    Terrified,
    Angry,
}

impl Animation {
    pub const ALL: [Animation; 9] = [
        Self::Talking0,
        Self::Talking1,
        Self::Talking2,
        Self::Crying,
        Self::Laughing,
        Self::Rumba,
        Self::Idle,
        Self::Terrified,
        Self::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Talking0 => "Talking_0",
            Self::Talking1 => "Talking_1",
            Self::Talking2 => "Talking_2",
            Self::Crying => "Crying",
            Self::Laughing => "Laughing",
            Self::Rumba => "Rumba",
            Self::Idle => "Idle",
            Self::Terrified => "Terrified",
            Self::Angry => "Angry",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Animation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Self::from_name).unwrap_or_default())
    }
}
