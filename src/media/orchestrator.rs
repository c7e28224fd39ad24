// ReelPress Compression Orchestrator
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// Turns an acquired source path into a compressed copy inside the cache
// directory and lists the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use super::cache_dir::ensure_dir_exists;
use super::fs_binding::{measure, FileSystem};
use super::transcoder::{TranscodeParams, Transcoder};
use crate::config::ConcurrencyPolicy;
use crate::error::WorkflowError;
use crate::state::{ListStore, VideoRecord};

pub const OUTPUT_EXTENSION: &str = "mp4";

pub struct CompressionOrchestrator {
    fs: Arc<dyn FileSystem>,
    transcoder: Arc<dyn Transcoder>,
    records: ListStore,
    cache_root: PathBuf,
    params: TranscodeParams,
    gate: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
}

impl CompressionOrchestrator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        transcoder: Arc<dyn Transcoder>,
        records: ListStore,
        cache_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            transcoder,
            records,
            cache_root: cache_root.into(),
            params: TranscodeParams::default(),
            gate: None,
            timeout: None,
        }
    }

    pub fn with_params(mut self, params: TranscodeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.gate = match policy {
            ConcurrencyPolicy::Parallel => None,
            ConcurrencyPolicy::Serialized => Some(Arc::new(Semaphore::new(1))),
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Fresh `<cache>/<uuid-v4>.mp4`.
    pub fn next_output_path(&self) -> PathBuf {
        self.cache_root
            .join(format!("{}.{}", Uuid::new_v4(), OUTPUT_EXTENSION))
    }

    /// Compress `source` and append the output's record. Returns that record.
    pub async fn compress_video(&self, source: &Path) -> Result<VideoRecord, WorkflowError> {
        let output = self.next_output_path();

        let dir_status = ensure_dir_exists(self.fs.as_ref(), &self.cache_root).await;
        if !dir_status.is_usable() {
            warn!("[COMPRESS] Continuing without a confirmed cache directory");
        }

        let args = self.params.to_args(source, &output)?;
        info!(
            "[COMPRESS] {}",
            self.params
                .command_line(self.transcoder.binary(), source, &output)
        );

        // Held until the transcoder returns. The gate is never closed.
        let _permit = match &self.gate {
            Some(gate) => gate.clone().acquire_owned().await.ok(),
            None => None,
        };

        let session = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.transcoder.execute(&args))
                .await
                .map_err(|_| WorkflowError::TranscodeTimedOut(limit))??,
            None => self.transcoder.execute(&args).await?,
        };

        if !session.succeeded() {
            return Err(WorkflowError::TranscodeFailed {
                exit_code: session.exit_code,
                log_tail: session.log_tail,
            });
        }

        let record = measure(self.fs.as_ref(), &output).await?;
        info!("[COMPRESS] ✅ {:?} -> {} MB", output, record.size);
        self.records.append(record.clone());
        Ok(record)
    }
}
