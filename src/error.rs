// ReelPress Error Types
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use std::path::PathBuf;
use thiserror::Error;

/// Every failure a workflow step can report. Callers decide whether to log and
/// continue; nothing in the library panics on these.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("picker was cancelled by the user")]
    PickerCancelled,

    #[error("picker failed: {0}")]
    PickerFailed(String),

    #[error("picker returned no usable source path")]
    MissingSourcePath,

    #[error("failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {binary:?}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcoder exited with {exit_code:?}: {log_tail}")]
    TranscodeFailed {
        exit_code: Option<i32>,
        log_tail: String,
    },

    #[error("transcoder did not finish within {0:?}")]
    TranscodeTimedOut(std::time::Duration),

    #[error("invalid transcode parameters: {0}")]
    InvalidParams(String),

    #[error("preview failed: {0}")]
    Preview(String),
}

impl WorkflowError {
    /// Cancellation is a normal user action, not something worth a warning.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, WorkflowError::PickerCancelled)
    }
}
