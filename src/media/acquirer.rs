// ReelPress Media Acquirer
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::fs_binding::{measure, FileSystem};
use super::picker::{MediaPicker, Platform, PickerRequest};
use crate::error::WorkflowError;
use crate::state::{ListStore, VideoRecord};

/// A picked file after it has been measured and listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub source: PathBuf,
    pub record: VideoRecord,
}

/// Picks a video, measures it and appends it to the list.
pub struct MediaAcquirer {
    picker: Arc<dyn MediaPicker>,
    fs: Arc<dyn FileSystem>,
    records: ListStore,
    platform: Platform,
    request: PickerRequest,
}

impl MediaAcquirer {
    pub fn new(
        picker: Arc<dyn MediaPicker>,
        fs: Arc<dyn FileSystem>,
        records: ListStore,
        platform: Platform,
    ) -> Self {
        Self {
            picker,
            fs,
            records,
            platform,
            request: PickerRequest::default(),
        }
    }

    /// Nothing is appended unless both the pick and the stat succeed.
    pub async fn acquire(&self) -> Result<Acquired, WorkflowError> {
        let picked = self.picker.pick(&self.request).await?;
        let source = picked.resolve(self.platform)?;
        let record = measure(self.fs.as_ref(), &source).await?;

        info!("[ACQUIRE] {:?} is {} MB", source, record.size);
        self.records.append(record.clone());

        Ok(Acquired { source, record })
    }
}
