//! Transcribe Command Handlers

use std::sync::Arc;

use crate::application::commands::TranscribeAudio;
use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStoragePort, TranscriptionPort};

/// TranscribeAudio Handler
///
/// 音频先落盘为临时文件再交给转写服务；临时文件随 `NamedTempFile` 析构删除
pub struct TranscribeAudioHandler {
    transcriber: Arc<dyn TranscriptionPort>,
    storage: Arc<dyn ArtifactStoragePort>,
}

impl TranscribeAudioHandler {
    pub fn new(
        transcriber: Arc<dyn TranscriptionPort>,
        storage: Arc<dyn ArtifactStoragePort>,
    ) -> Self {
        Self {
            transcriber,
            storage,
        }
    }

    pub async fn handle(&self, cmd: TranscribeAudio) -> Result<String, ApplicationError> {
        if cmd.audio.is_empty() {
            return Err(ApplicationError::validation("No audio data provided"));
        }

        let scratch = self.storage.scratch_root();
        tokio::fs::create_dir_all(&scratch)
            .await
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

        let temp = tempfile::Builder::new()
            .prefix("speech_")
            .suffix(&format!(".{}", cmd.file_extension()))
            .tempfile_in(&scratch)
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

        tokio::fs::write(temp.path(), &cmd.audio)
            .await
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

        tracing::info!(
            path = %temp.path().display(),
            size = cmd.audio.len(),
            mime = %cmd.mime(),
            "Audio saved, transcribing"
        );

        let result = self.transcriber.transcribe(temp.path(), cmd.mime()).await;

        if let Err(e) = temp.close() {
            tracing::warn!(error = %e, "Failed to delete temporary audio file");
        }

        let text = result.map_err(|e| {
            tracing::error!(error = %e, "Transcription failed");
            ApplicationError::from(e)
        })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            tracing::warn!("Transcription returned no text");
            return Err(ApplicationError::transcription("Transcription returned no text"));
        }

        tracing::info!(chars = text.chars().count(), "Transcription successful");
        Ok(text)
    }
}
