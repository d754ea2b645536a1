//! HTTP Handlers

mod chat;
mod ping;
mod speech;

pub use chat::*;
pub use ping::*;
pub use speech::*;
