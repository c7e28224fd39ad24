// ReelPress File-System Binding
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use async_trait::async_trait;
use std::path::Path;

use crate::error::WorkflowError;
use crate::state::VideoRecord;

/// Result of a stat call. Only the byte size is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
}

/// The three file-system calls the workflow needs.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    /// Non-recursive create.
    async fn mkdir(&self, path: &Path) -> Result<(), WorkflowError>;

    async fn stat(&self, path: &Path) -> Result<FileStat, WorkflowError>;
}

/// `FileSystem` over the real disk through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

#[async_trait]
impl FileSystem for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn mkdir(&self, path: &Path) -> Result<(), WorkflowError> {
        tokio::fs::create_dir(path)
            .await
            .map_err(|source| WorkflowError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, WorkflowError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| WorkflowError::Stat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(FileStat {
            size: metadata.len(),
        })
    }
}

/// Stat `path` and build the record that goes into the list.
pub async fn measure(fs: &dyn FileSystem, path: &Path) -> Result<VideoRecord, WorkflowError> {
    let stat = fs.stat(path).await?;
    Ok(VideoRecord::new(path.to_string_lossy(), stat.size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_fs_stat_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mov");
        std::fs::write(&file, vec![0u8; 2048]).unwrap();

        let fs = LocalFs;
        assert!(fs.exists(&file).await);
        assert_eq!(fs.stat(&file).await.unwrap().size, 2048);

        let record = measure(&fs, &file).await.unwrap();
        assert_eq!(record.url, file.to_string_lossy());
        assert_eq!(record.size, "0.00");
    }

    #[tokio::test]
    async fn test_local_fs_stat_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFs.stat(&dir.path().join("nope.mp4")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Stat { .. }));
    }

    #[tokio::test]
    async fn test_local_fs_mkdir_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        assert!(LocalFs.mkdir(&nested).await.is_err());
        LocalFs.mkdir(&dir.path().join("a")).await.unwrap();
        assert!(LocalFs.exists(&dir.path().join("a")).await);
    }
}
