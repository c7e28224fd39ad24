// ReelPress Transcoder
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// Typed ffmpeg parameters and the subprocess that runs them. Arguments are
// passed as a discrete vector so paths with spaces or quotes survive intact.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::WorkflowError;

/// Lines of stderr kept on the session for diagnostics.
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Bt709,
}

impl ColorSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Bt709 => "bt709",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Yuv420p,
}

impl PixelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Yuv420p => "yuv420p",
        }
    }
}

/// `colorspace` filter normalising both output and input to one colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFilter {
    pub all: ColorSpace,
    pub iall: ColorSpace,
    pub format: PixelFormat,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            all: ColorSpace::Bt709,
            iall: ColorSpace::Bt709,
            format: PixelFormat::Yuv420p,
        }
    }
}

impl ColorFilter {
    pub fn to_filter_string(&self) -> String {
        format!(
            "colorspace=all={}:iall={}:format={}",
            self.all.as_str(),
            self.iall.as_str(),
            self.format.as_str()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    Mpeg4,
}

impl VideoCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::Mpeg4 => "mpeg4",
        }
    }
}

/// Everything the compression command varies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeParams {
    /// Output frames per second (`-r`).
    pub frame_rate: u32,
    pub color_filter: ColorFilter,
    pub video_codec: VideoCodec,
    /// `-q:v`, lower is better.
    pub video_quality: u8,
    /// `-q:a`.
    pub audio_quality: u8,
}

impl Default for TranscodeParams {
    fn default() -> Self {
        Self {
            frame_rate: 10,
            color_filter: ColorFilter::default(),
            video_codec: VideoCodec::Mpeg4,
            video_quality: 3,
            audio_quality: 5,
        }
    }
}

impl TranscodeParams {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !(1..=240).contains(&self.frame_rate) {
            return Err(WorkflowError::InvalidParams(format!(
                "frame rate {} outside 1..=240",
                self.frame_rate
            )));
        }
        if !(1..=31).contains(&self.video_quality) {
            return Err(WorkflowError::InvalidParams(format!(
                "video quality {} outside 1..=31",
                self.video_quality
            )));
        }
        if self.audio_quality > 9 {
            return Err(WorkflowError::InvalidParams(format!(
                "audio quality {} outside 0..=9",
                self.audio_quality
            )));
        }
        Ok(())
    }

    /// Validated argument vector for `ffmpeg`.
    pub fn to_args(&self, input: &Path, output: &Path) -> Result<Vec<OsString>, WorkflowError> {
        self.validate()?;
        if input.as_os_str().is_empty() {
            return Err(WorkflowError::MissingSourcePath);
        }

        let mut args: Vec<OsString> = vec!["-nostdin".into(), "-hide_banner".into()];
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-r".into());
        args.push(self.frame_rate.to_string().into());
        args.push("-vf".into());
        args.push(self.color_filter.to_filter_string().into());
        args.push("-c:v".into());
        args.push(self.video_codec.as_str().into());
        args.push("-q:v".into());
        args.push(self.video_quality.to_string().into());
        args.push("-q:a".into());
        args.push(self.audio_quality.to_string().into());
        args.push(output.as_os_str().to_owned());
        Ok(args)
    }

    /// Human-readable rendering of the command, for logs only.
    pub fn command_line(&self, binary: &Path, input: &Path, output: &Path) -> String {
        let mut line = binary.to_string_lossy().to_string();
        if let Ok(args) = self.to_args(input, output) {
            for arg in args {
                line.push(' ');
                line.push_str(&arg.to_string_lossy());
            }
        }
        line
    }
}

/// Outcome of one transcoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSession {
    pub exit_code: Option<i32>,
    pub log_tail: String,
    pub elapsed: Duration,
}

impl TranscodeSession {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Run to completion. Only launch failures are errors; a non-zero exit
    /// comes back inside the session.
    async fn execute(&self, args: &[OsString]) -> Result<TranscodeSession, WorkflowError>;

    /// Binary name, used in log lines.
    fn binary(&self) -> &Path;
}

/// Runs the system ffmpeg through `tokio::process`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn execute(&self, args: &[OsString]) -> Result<TranscodeSession, WorkflowError> {
        let started = Instant::now();
        debug!("[COMPRESS] Spawning {:?} with {} args", self.binary, args.len());

        // kill_on_drop lets a timeout in the caller stop the child.
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| WorkflowError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let session = TranscodeSession {
            exit_code: output.status.code(),
            log_tail: tail_lines(&String::from_utf8_lossy(&output.stderr), LOG_TAIL_LINES),
            elapsed: started.elapsed(),
        };
        info!(
            "[COMPRESS] {:?} finished in {:.1}s (exit {:?})",
            self.binary,
            session.elapsed.as_secs_f64(),
            session.exit_code
        );
        Ok(session)
    }

    fn binary(&self) -> &Path {
        &self.binary
    }
}

fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_compression_profile() {
        let params = TranscodeParams::default();
        let args: Vec<String> = params
            .to_args(Path::new("/in/video1.mov"), Path::new("/cache/abc.mp4"))
            .unwrap()
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(
            args,
            vec![
                "-nostdin",
                "-hide_banner",
                "-i",
                "/in/video1.mov",
                "-r",
                "10",
                "-vf",
                "colorspace=all=bt709:iall=bt709:format=yuv420p",
                "-c:v",
                "mpeg4",
                "-q:v",
                "3",
                "-q:a",
                "5",
                "/cache/abc.mp4",
            ]
        );
    }

    #[test]
    fn test_paths_with_spaces_stay_single_args() {
        let args = TranscodeParams::default()
            .to_args(Path::new("/my videos/clip one.mov"), Path::new("/cache/out.mp4"))
            .unwrap();
        assert!(args.contains(&OsString::from("/my videos/clip one.mov")));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut params = TranscodeParams::default();
        params.frame_rate = 0;
        assert!(params.validate().is_err());

        let mut params = TranscodeParams::default();
        params.video_quality = 40;
        assert!(params.validate().is_err());

        let mut params = TranscodeParams::default();
        params.audio_quality = 12;
        assert!(matches!(
            params.to_args(Path::new("a.mov"), Path::new("b.mp4")),
            Err(WorkflowError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = TranscodeParams::default().to_args(Path::new(""), Path::new("b.mp4"));
        assert!(matches!(result, Err(WorkflowError::MissingSourcePath)));
    }

    #[test]
    fn test_command_line_rendering() {
        let line = TranscodeParams::default().command_line(
            Path::new("ffmpeg"),
            Path::new("in.mov"),
            Path::new("out.mp4"),
        );
        assert!(line.starts_with("ffmpeg -nostdin"));
        assert!(line.ends_with("-q:a 5 out.mp4"));
    }

    #[test]
    fn test_tail_lines() {
        assert_eq!(tail_lines("a\nb\nc\nd", 2), "c\nd");
        assert_eq!(tail_lines("only", 5), "only");
        assert_eq!(tail_lines("", 5), "");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let transcoder = FfmpegTranscoder::new("/definitely/not/ffmpeg-reelpress");
        let err = transcoder.execute(&[]).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Spawn { .. }));
    }
}
