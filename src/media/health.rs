// ReelPress Dependency Check
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::AppConfig;

/// One line of the doctor report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub name: String,
    pub available: bool,
    pub detail: String,
}

/// Probe the external tools the workflow shells out to.
pub async fn check_dependencies(config: &AppConfig) -> Vec<DependencyReport> {
    let mut reports = Vec::new();

    let ffmpeg = match Command::new(&config.ffmpeg_bin)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
    {
        Ok(out) if out.status.success() => {
            let banner = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            info!("[HEALTH] ✅ {}", banner);
            DependencyReport {
                name: config.ffmpeg_bin.to_string_lossy().to_string(),
                available: true,
                detail: banner,
            }
        }
        Ok(out) => {
            warn!("[HEALTH] {:?} -version exited with {:?}", config.ffmpeg_bin, out.status.code());
            DependencyReport {
                name: config.ffmpeg_bin.to_string_lossy().to_string(),
                available: false,
                detail: format!("exit status {:?}", out.status.code()),
            }
        }
        Err(e) => {
            warn!("[HEALTH] {:?} not runnable: {}", config.ffmpeg_bin, e);
            DependencyReport {
                name: config.ffmpeg_bin.to_string_lossy().to_string(),
                available: false,
                detail: e.to_string(),
            }
        }
    };
    reports.push(ffmpeg);

    reports
}

/// Names of the dependencies that are missing.
pub fn missing(reports: &[DependencyReport]) -> Vec<String> {
    reports
        .iter()
        .filter(|r| !r.available)
        .map(|r| r.name.clone())
        .collect()
}
