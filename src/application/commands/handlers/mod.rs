//! Command Handlers 实现

mod reply_handlers;
mod transcribe_handlers;

pub use reply_handlers::*;
pub use transcribe_handlers::*;
