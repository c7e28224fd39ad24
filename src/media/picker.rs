// ReelPress Media Picker
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// The picker is an external collaborator: it hands back a local path for a
// chosen video. The desktop build uses a native file dialog; the headless CLI
// uses a fixed path.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::error::WorkflowError;

/// Extensions offered by the native dialog.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "mkv", "avi", "webm", "3gp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Video,
}

/// Compression hint forwarded to pickers that transcode on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressPreset {
    HighestQuality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    pub media_type: MediaType,
    pub compress_preset: CompressPreset,
}

impl Default for PickerRequest {
    fn default() -> Self {
        Self {
            media_type: MediaType::Video,
            compress_preset: CompressPreset::HighestQuality,
        }
    }
}

/// Which response field carries the file location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Desktop
        }
    }
}

/// Raw picker response. Only one of the fields is meaningful per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickedMedia {
    pub path: Option<PathBuf>,
    pub source_url: Option<String>,
}

impl PickedMedia {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            source_url: None,
        }
    }

    /// iOS reads `source_url` (empty when absent); everything else reads `path`.
    pub fn resolve(&self, platform: Platform) -> Result<PathBuf, WorkflowError> {
        let resolved = match platform {
            Platform::Ios => PathBuf::from(self.source_url.clone().unwrap_or_default()),
            Platform::Android | Platform::Desktop => self.path.clone().unwrap_or_default(),
        };
        if resolved.as_os_str().is_empty() {
            return Err(WorkflowError::MissingSourcePath);
        }
        Ok(resolved)
    }
}

#[async_trait]
pub trait MediaPicker: Send + Sync {
    async fn pick(&self, request: &PickerRequest) -> Result<PickedMedia, WorkflowError>;
}

/// Native file dialog (rfd), run on a blocking thread.
#[derive(Debug, Default, Clone)]
pub struct DialogPicker {
    pub title: Option<String>,
}

#[async_trait]
impl MediaPicker for DialogPicker {
    async fn pick(&self, request: &PickerRequest) -> Result<PickedMedia, WorkflowError> {
        info!(
            "[PICKER] Opening dialog ({:?}, preset {:?})",
            request.media_type, request.compress_preset
        );
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| "Select a video".to_string());

        let picked = tokio::task::spawn_blocking(move || {
            rfd::FileDialog::new()
                .set_title(title.as_str())
                .add_filter("Video", VIDEO_EXTENSIONS)
                .pick_file()
        })
        .await
        .map_err(|e| WorkflowError::PickerFailed(e.to_string()))?;

        match picked {
            Some(path) => {
                info!("[PICKER] Selected {:?}", path);
                Ok(PickedMedia::from_path(path))
            }
            None => Err(WorkflowError::PickerCancelled),
        }
    }
}

/// Picker that always answers with the same path.
#[derive(Debug, Clone)]
pub struct StaticPicker {
    path: PathBuf,
}

impl StaticPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MediaPicker for StaticPicker {
    async fn pick(&self, _request: &PickerRequest) -> Result<PickedMedia, WorkflowError> {
        Ok(PickedMedia::from_path(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_per_platform() {
        let picked = PickedMedia {
            path: Some(PathBuf::from("/storage/video1.mp4")),
            source_url: Some("/var/mobile/video1.mov".to_string()),
        };
        assert_eq!(
            picked.resolve(Platform::Ios).unwrap(),
            PathBuf::from("/var/mobile/video1.mov")
        );
        assert_eq!(
            picked.resolve(Platform::Android).unwrap(),
            PathBuf::from("/storage/video1.mp4")
        );
    }

    #[test]
    fn test_ios_without_source_url_is_rejected() {
        let picked = PickedMedia::from_path("/storage/video1.mp4");
        assert!(matches!(
            picked.resolve(Platform::Ios),
            Err(WorkflowError::MissingSourcePath)
        ));
    }

    #[test]
    fn test_default_request_asks_for_video() {
        let request = PickerRequest::default();
        assert_eq!(request.media_type, MediaType::Video);
        assert_eq!(request.compress_preset, CompressPreset::HighestQuality);
    }

    #[tokio::test]
    async fn test_static_picker() {
        let picker = StaticPicker::new("/tmp/in.mov");
        let picked = picker.pick(&PickerRequest::default()).await.unwrap();
        assert_eq!(picked.resolve(Platform::Desktop).unwrap(), PathBuf::from("/tmp/in.mov"));
    }
}
