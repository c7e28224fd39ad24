// Test doubles for the workflow collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use reelpress_core::media::fs_binding::{FileStat, FileSystem};
use reelpress_core::media::picker::{MediaPicker, PickedMedia, PickerRequest};
use reelpress_core::media::transcoder::{TranscodeSession, Transcoder};
use reelpress_core::WorkflowError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const MB: u64 = 1_048_576;

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<HashMap<PathBuf, u64>>,
    dirs: Mutex<HashSet<PathBuf>>,
    pub mkdir_calls: AtomicUsize,
    pub fail_mkdir: bool,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_mkdir() -> Self {
        Self {
            fail_mkdir: true,
            ..Self::default()
        }
    }

    pub fn put_file(&self, path: impl Into<PathBuf>, size: u64) {
        self.files.lock().unwrap().insert(path.into(), size);
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }
}

#[async_trait]
impl FileSystem for FakeFs {
    async fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
    }

    async fn mkdir(&self, path: &Path) -> Result<(), WorkflowError> {
        self.mkdir_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mkdir {
            return Err(WorkflowError::CreateDir {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, WorkflowError> {
        match self.files.lock().unwrap().get(path) {
            Some(size) => Ok(FileStat { size: *size }),
            None => Err(WorkflowError::Stat {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Hands out queued responses, one per pick.
#[derive(Default)]
pub struct QueuePicker {
    responses: Mutex<VecDeque<Result<PickedMedia, WorkflowError>>>,
}

impl QueuePicker {
    pub fn new(responses: Vec<Result<PickedMedia, WorkflowError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl MediaPicker for QueuePicker {
    async fn pick(&self, _request: &PickerRequest) -> Result<PickedMedia, WorkflowError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(WorkflowError::PickerCancelled))
    }
}

#[derive(Clone)]
pub enum Behavior {
    /// Write the output file with this size and exit 0.
    Produce(u64),
    /// Exit with this code without writing anything.
    Exit(i32),
    /// Fail to launch.
    SpawnError,
    /// Never finish.
    Hang,
}

/// Writes its output into a `FakeFs` instead of running ffmpeg.
pub struct FakeTranscoder {
    fs: Arc<FakeFs>,
    behavior: Behavior,
    gate: Option<Arc<Semaphore>>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    running: AtomicUsize,
    pub max_running: AtomicUsize,
    pub seen_args: Mutex<Vec<Vec<OsString>>>,
    binary: PathBuf,
}

impl FakeTranscoder {
    pub fn new(fs: Arc<FakeFs>, behavior: Behavior) -> Self {
        Self {
            fs,
            behavior,
            gate: None,
            delay: None,
            calls: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
            seen_args: Mutex::new(Vec::new()),
            binary: PathBuf::from("fake-ffmpeg"),
        }
    }

    /// Each run waits for one permit before finishing.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn execute(&self, args: &[OsString]) -> Result<TranscodeSession, WorkflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_args.lock().unwrap().push(args.to_vec());

        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let result = match &self.behavior {
            Behavior::Produce(size) => {
                let output = PathBuf::from(args.last().expect("output arg"));
                self.fs.put_file(output, *size);
                Ok(TranscodeSession {
                    exit_code: Some(0),
                    log_tail: String::new(),
                    elapsed: Duration::from_millis(1),
                })
            }
            Behavior::Exit(code) => Ok(TranscodeSession {
                exit_code: Some(*code),
                log_tail: "Conversion failed!".to_string(),
                elapsed: Duration::from_millis(1),
            }),
            Behavior::SpawnError => Err(WorkflowError::Spawn {
                binary: self.binary.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            Behavior::Hang => std::future::pending().await,
        };

        self.running.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn binary(&self) -> &Path {
        &self.binary
    }
}
