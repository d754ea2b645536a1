//! Application State

use std::sync::Arc;

use crate::application::{
    ArtifactStoragePort, GenerateReplyHandler, ReplyPipelineConfig, ReplyProviders,
    TranscribeAudioHandler, TranscriptionPort,
};

/// 应用状态
pub struct AppState {
    pub reply_handler: GenerateReplyHandler,
    pub transcribe_handler: TranscribeAudioHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// 回复流水线与转写共用同一个产物存储
    pub fn new(
        pipeline: ReplyPipelineConfig,
        providers: ReplyProviders,
        transcriber: Arc<dyn TranscriptionPort>,
    ) -> Self {
        let storage: Arc<dyn ArtifactStoragePort> = providers.storage.clone();

        Self {
            reply_handler: GenerateReplyHandler::new(pipeline, providers),
            transcribe_handler: TranscribeAudioHandler::new(transcriber, storage),
        }
    }
}
