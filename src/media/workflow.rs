// ReelPress Video Workflow
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// The "Open Picker" handler: acquire a video, list it, then compress it in the
// background and list the compressed copy when it lands.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::acquirer::MediaAcquirer;
use super::fs_binding::{FileSystem, LocalFs};
use super::orchestrator::CompressionOrchestrator;
use super::picker::MediaPicker;
use super::transcoder::{FfmpegTranscoder, Transcoder};
use crate::config::AppConfig;
use crate::error::WorkflowError;
use crate::state::{ListStore, VideoRecord};

/// What one press of the picker button produced.
#[must_use]
#[derive(Debug)]
pub enum PickOutcome {
    Cancelled,
    Failed(WorkflowError),
    Acquired {
        record: VideoRecord,
        compression: JoinHandle<Result<VideoRecord, WorkflowError>>,
    },
}

pub struct VideoWorkflow {
    acquirer: MediaAcquirer,
    orchestrator: Arc<CompressionOrchestrator>,
    records: ListStore,
}

impl VideoWorkflow {
    pub fn new(
        acquirer: MediaAcquirer,
        orchestrator: Arc<CompressionOrchestrator>,
        records: ListStore,
    ) -> Self {
        Self {
            acquirer,
            orchestrator,
            records,
        }
    }

    /// Wire the real disk and ffmpeg behind `picker`.
    pub fn from_config(config: &AppConfig, picker: Arc<dyn MediaPicker>) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFs);
        let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegTranscoder::new(&config.ffmpeg_bin));
        Self::assemble(config, picker, fs, transcoder)
    }

    pub fn assemble(
        config: &AppConfig,
        picker: Arc<dyn MediaPicker>,
        fs: Arc<dyn FileSystem>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        let records = ListStore::new();
        let acquirer = MediaAcquirer::new(picker, fs.clone(), records.clone(), config.platform);
        let orchestrator = CompressionOrchestrator::new(
            fs,
            transcoder,
            records.clone(),
            config.cache_root.clone(),
        )
        .with_policy(config.concurrency)
        .with_timeout(config.transcode_timeout);

        Self::new(acquirer, Arc::new(orchestrator), records)
    }

    pub fn records(&self) -> &ListStore {
        &self.records
    }

    pub fn orchestrator(&self) -> &Arc<CompressionOrchestrator> {
        &self.orchestrator
    }

    /// Never returns an error: failures are logged and folded into the outcome.
    /// Must be called from inside a tokio runtime.
    pub async fn open_picker(&self) -> PickOutcome {
        let acquired = match self.acquirer.acquire().await {
            Ok(acquired) => acquired,
            Err(e) if e.is_cancellation() => {
                info!("[PICKER] Cancelled, list unchanged");
                return PickOutcome::Cancelled;
            }
            Err(e) => {
                warn!("[ACQUIRE] ❌ {}", e);
                return PickOutcome::Failed(e);
            }
        };

        let orchestrator = self.orchestrator.clone();
        let source = acquired.source;
        let compression = tokio::spawn(async move {
            let result = orchestrator.compress_video(&source).await;
            if let Err(e) = &result {
                error!("[COMPRESS] ❌ {:?}: {}", source, e);
            }
            result
        });

        PickOutcome::Acquired {
            record: acquired.record,
            compression,
        }
    }
}
