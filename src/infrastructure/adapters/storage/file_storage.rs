//! File Storage - 文件系统产物存储实现
//!
//! 实现 ArtifactStoragePort trait

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactKind, ArtifactStorageError, ArtifactStoragePort};
use crate::domain::reply::{RequestId, SegmentMedia, VisemeTrack};

/// 文件系统产物存储
pub struct FileArtifactStorage {
    /// 临时产物根目录
    scratch_dir: PathBuf,
    /// 预录台词目录
    assets_dir: PathBuf,
}

impl FileArtifactStorage {
    /// 创建新的文件存储
    pub async fn new(
        scratch_dir: impl AsRef<Path>,
        assets_dir: impl AsRef<Path>,
    ) -> Result<Self, ArtifactStorageError> {
        let scratch_dir = scratch_dir.as_ref().to_path_buf();
        let assets_dir = assets_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&scratch_dir)
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;

        if !assets_dir.exists() {
            tracing::warn!(
                assets_dir = %assets_dir.display(),
                "Assets directory not found, scripted replies will have no audio"
            );
        }

        Ok(Self {
            scratch_dir,
            assets_dir,
        })
    }

    async fn read_clip_audio(&self, clip: &str) -> Option<String> {
        let path = self.assets_dir.join(format!("{}.wav", clip));
        match fs::read(&path).await {
            Ok(data) => Some(STANDARD.encode(data)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Error reading clip audio");
                None
            }
        }
    }

    async fn read_clip_lipsync(&self, clip: &str) -> Option<VisemeTrack> {
        let path = self.assets_dir.join(format!("{}.json", clip));
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Error reading clip lipsync");
                return None;
            }
        };
        match serde_json::from_slice(&data) {
            Ok(track) => Some(track),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid clip lipsync JSON");
                None
            }
        }
    }
}

#[async_trait]
impl ArtifactStoragePort for FileArtifactStorage {
    fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone()
    }

    fn request_dir(&self, request_id: RequestId) -> PathBuf {
        self.scratch_dir.join(request_id.to_string())
    }

    fn artifact_path(&self, request_id: RequestId, index: usize, kind: ArtifactKind) -> PathBuf {
        self.request_dir(request_id)
            .join(format!("message_{}.{}", index, kind.extension()))
    }

    async fn save_artifact(
        &self,
        request_id: RequestId,
        index: usize,
        kind: ArtifactKind,
        data: &[u8],
    ) -> Result<PathBuf, ArtifactStorageError> {
        let request_dir = self.request_dir(request_id);

        fs::create_dir_all(&request_dir)
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;

        let path = self.artifact_path(request_id, index, kind);

        fs::write(&path, data)
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved artifact: request={}, index={}, kind={:?}, size={} bytes",
            request_id,
            index,
            kind,
            data.len()
        );

        Ok(path)
    }

    async fn cleanup_request(&self, request_id: RequestId) -> Result<u64, ArtifactStorageError> {
        let request_dir = self.request_dir(request_id);

        if !request_dir.exists() {
            return Ok(0);
        }

        let mut deleted_count = 0u64;
        let mut entries = fs::read_dir(&request_dir)
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?
        {
            fs::remove_file(entry.path())
                .await
                .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;
            deleted_count += 1;
        }

        fs::remove_dir(&request_dir)
            .await
            .map_err(|e| ArtifactStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Cleaned request artifacts: request={}, files={}",
            request_id,
            deleted_count
        );

        Ok(deleted_count)
    }

    async fn load_clip(&self, clip: &str) -> Option<SegmentMedia> {
        let audio = self.read_clip_audio(clip).await?;
        let lipsync = self.read_clip_lipsync(clip).await;
        Some(SegmentMedia { audio, lipsync })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(root: &Path) -> FileArtifactStorage {
        FileArtifactStorage::new(root.join("scratch"), root.join("assets"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_cleanup_artifacts() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;
        let request_id = RequestId::new();

        for kind in [ArtifactKind::SynthesizedAudio, ArtifactKind::Wave, ArtifactKind::Visemes] {
            let path = storage
                .save_artifact(request_id, 0, kind, b"data")
                .await
                .unwrap();
            assert!(path.exists());
            assert_eq!(path.extension().unwrap(), kind.extension());
        }

        let deleted = storage.cleanup_request(request_id).await.unwrap();
        assert_eq!(deleted, 3);
        assert!(!storage.request_dir(request_id).exists());

        // 再次清理是空操作
        assert_eq!(storage.cleanup_request(request_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_requests_do_not_share_paths() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;

        let a = storage.artifact_path(RequestId::new(), 0, ArtifactKind::Wave);
        let b = storage.artifact_path(RequestId::new(), 0, ArtifactKind::Wave);
        assert_ne!(a, b);
        assert_eq!(a.file_name(), b.file_name());
    }

    #[tokio::test]
    async fn test_load_clip() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;
        let assets = temp_dir.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("intro_0.wav"), b"RIFF").unwrap();
        std::fs::write(
            assets.join("intro_0.json"),
            br#"{"metadata":{},"mouthCues":[{"start":0.0,"end":0.3,"value":"A"}]}"#,
        )
        .unwrap();

        let media = storage.load_clip("intro_0").await.unwrap();
        assert_eq!(media.audio, STANDARD.encode(b"RIFF"));
        assert_eq!(media.lipsync.unwrap().mouth_cues.len(), 1);
    }

    #[tokio::test]
    async fn test_load_clip_without_audio_drops_lipsync() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;
        let assets = temp_dir.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("api_0.json"), br#"{"mouthCues":[]}"#).unwrap();

        assert!(storage.load_clip("api_0").await.is_none());
    }

    #[tokio::test]
    async fn test_load_clip_with_bad_lipsync_keeps_audio() {
        let temp_dir = tempdir().unwrap();
        let storage = storage(temp_dir.path()).await;
        let assets = temp_dir.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("intro_1.wav"), b"RIFF").unwrap();
        std::fs::write(assets.join("intro_1.json"), b"not json").unwrap();

        let media = storage.load_clip("intro_1").await.unwrap();
        assert!(media.lipsync.is_none());
    }
}
