//! Lip Sync Adapter - Rhubarb 口型提取

mod rhubarb_extractor;

pub use rhubarb_extractor::{parse_rhubarb_output, RhubarbConfig, RhubarbExtractor};
