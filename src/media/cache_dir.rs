// ReelPress Cache Directory Guarantor
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use std::path::Path;
use tracing::{debug, error, info};

use super::fs_binding::FileSystem;

/// What `ensure_dir_exists` found or did. Failure is reported, never raised.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirStatus {
    AlreadyPresent,
    Created,
    Failed(String),
}

impl DirStatus {
    pub fn is_usable(&self) -> bool {
        !matches!(self, DirStatus::Failed(_))
    }
}

/// Make sure `dir` exists, creating it (non-recursively) when absent.
/// Never retries; errors are logged and returned as `DirStatus::Failed`.
pub async fn ensure_dir_exists(fs: &dyn FileSystem, dir: &Path) -> DirStatus {
    if fs.exists(dir).await {
        debug!("[CACHE] {:?} already present", dir);
        return DirStatus::AlreadyPresent;
    }

    match fs.mkdir(dir).await {
        Ok(()) => {
            info!("[CACHE] Created {:?}", dir);
            DirStatus::Created
        }
        Err(e) => {
            error!("[CACHE] Error ensuring directory {:?} exists: {}", dir, e);
            DirStatus::Failed(e.to_string())
        }
    }
}
