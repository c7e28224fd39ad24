// ReelPress Configuration
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// Read from the process environment after `.env` has been loaded.

use std::path::PathBuf;
use std::time::Duration;

use crate::media::picker::Platform;

pub const ENV_CACHE_DIR: &str = "REELPRESS_CACHE_DIR";
pub const ENV_FFMPEG: &str = "REELPRESS_FFMPEG";
pub const ENV_SERIALIZE: &str = "REELPRESS_SERIALIZE";
pub const ENV_TIMEOUT: &str = "REELPRESS_TRANSCODE_TIMEOUT_SECS";

/// Whether overlapping picks may transcode at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    #[default]
    Parallel,
    Serialized,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache_root: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub concurrency: ConcurrencyPolicy,
    pub transcode_timeout: Option<Duration>,
    pub platform: Platform,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_root: default_cache_root(),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            concurrency: ConcurrencyPolicy::Parallel,
            transcode_timeout: None,
            platform: Platform::current(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_CACHE_DIR) {
            config.cache_root = PathBuf::from(dir);
        }
        if let Some(bin) = get(ENV_FFMPEG) {
            config.ffmpeg_bin = PathBuf::from(bin);
        }
        if let Some(flag) = get(ENV_SERIALIZE) {
            if matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes") {
                config.concurrency = ConcurrencyPolicy::Serialized;
            }
        }
        if let Some(secs) = get(ENV_TIMEOUT) {
            match secs.parse::<u64>() {
                Ok(0) => {}
                Ok(n) => config.transcode_timeout = Some(Duration::from_secs(n)),
                Err(_) => tracing::warn!("[CONFIG] Ignoring {}={:?}", ENV_TIMEOUT, secs),
            }
        }
        config
    }
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("reelpress"))
        .unwrap_or_else(|| PathBuf::from(".reelpress-cache"))
}
