// ReelPress Looping Preview
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// ffmpeg decodes the clip forever (`-stream_loop -1`) into raw rgb24 frames on
// a pipe; a reader thread pushes them through a small bounded channel. Pausing
// simply stops draining the channel, which back-pressures ffmpeg.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{sync_channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::WorkflowError;

pub const PREVIEW_HEIGHT: usize = 230;
pub const PREVIEW_WIDTH: usize = 408;
const PREVIEW_FPS: f64 = 24.0;
const FRAME_BUFFER: usize = 5;

pub struct LoopingPreview {
    receiver: Receiver<Vec<u8>>,
    process: Option<Child>,
    pub width: usize,
    pub height: usize,
    fps: f64,
    last_frame_time: Option<Instant>,
    current_frame: Option<Vec<u8>>,
    paused: bool,
    ended: bool,
}

impl LoopingPreview {
    pub fn new(ffmpeg: &Path, path: &Path) -> Result<Self, WorkflowError> {
        let width = PREVIEW_WIDTH;
        let height = PREVIEW_HEIGHT;
        let fps = PREVIEW_FPS;

        // scale + crop = cover-fit into the fixed preview box
        let filter = format!(
            "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            w = width,
            h = height
        );

        let mut child = Command::new(ffmpeg)
            .arg("-nostdin")
            .arg("-stream_loop").arg("-1")
            .arg("-i").arg(path)
            .arg("-an")
            .arg("-vf").arg(filter)
            .arg("-f").arg("image2pipe")
            .arg("-pix_fmt").arg("rgb24")
            .arg("-vcodec").arg("rawvideo")
            .arg("-r").arg(fps.to_string())
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| WorkflowError::Spawn {
                binary: ffmpeg.to_path_buf(),
                source,
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| WorkflowError::Preview("ffmpeg stdout not captured".to_string()))?;
        let (tx, rx) = sync_channel(FRAME_BUFFER);

        let frame_size = width * height * 3;
        let label = path.to_string_lossy().to_string();

        thread::spawn(move || {
            let mut buffer = vec![0u8; frame_size];
            while stdout.read_exact(&mut buffer).is_ok() {
                if tx.send(buffer.clone()).is_err() {
                    break; // preview dropped
                }
            }
            debug!("[PREVIEW] Decoder for {} stopped", label);
        });

        Ok(Self {
            receiver: rx,
            process: Some(child),
            width,
            height,
            fps,
            last_frame_time: None,
            current_frame: None,
            paused: false,
            ended: false,
        })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Decoder exited (unreadable file, or ffmpeg died).
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.last_frame_time = None;
    }

    /// Advance according to wall time. Returns a frame only when a new one is
    /// due and decoded; otherwise the caller keeps showing the last upload.
    pub fn poll_new_frame(&mut self) -> Option<&[u8]> {
        if self.paused || self.ended {
            return None;
        }

        let now = Instant::now();
        let frame_duration = Duration::from_secs_f64(1.0 / self.fps);
        if let Some(last) = self.last_frame_time {
            if now.duration_since(last) < frame_duration {
                return None;
            }
        }

        match self.receiver.try_recv() {
            Ok(frame) => {
                self.current_frame = Some(frame);
                self.last_frame_time = Some(now);
                self.current_frame.as_deref()
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.ended = true;
                None
            }
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.ended = true;
    }
}

impl Drop for LoopingPreview {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_decoder_binary() {
        let result = LoopingPreview::new(
            Path::new("/no/such/ffmpeg-reelpress"),
            Path::new("clip.mp4"),
        );
        assert!(matches!(result, Err(WorkflowError::Spawn { .. })));
    }

    #[test]
    fn test_preview_box_is_wide() {
        assert!(PREVIEW_WIDTH > PREVIEW_HEIGHT);
        assert_eq!(PREVIEW_HEIGHT, 230);
    }
}
