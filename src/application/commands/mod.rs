//! 应用层 - 命令
//!
//! 回复生成与语音转写

mod reply_commands;
mod transcribe_commands;

pub mod handlers;

pub use reply_commands::*;
pub use transcribe_commands::*;
