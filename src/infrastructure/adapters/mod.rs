//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod chat;
pub mod lipsync;
pub mod process;
pub mod storage;
pub mod transcoder;
pub mod transcription;
pub mod tts;

pub use chat::*;
pub use lipsync::*;
pub use storage::*;
pub use transcoder::*;
pub use transcription::*;
pub use tts::*;
