//! Domain Layer - 领域层
//!
//! - Reply Context: 回复片段、对话内容解析、固定台词

pub mod reply;
