//! Media duration probing via ffprobe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::config::ToolSettings;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe binary could not be started at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe ran and exited unsuccessfully.
    #[error("{tool} exited with code {exit_code}: {message}")]
    Failed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The probe output did not contain a usable duration.
    #[error("could not read a duration from probe output '{0}'")]
    Unparsable(String),
}

/// Reports the playable duration of a media file, used to reject cut
/// points past the end before any transcoding starts.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn duration_secs(&self, input: &Path) -> Result<f64, ProbeError>;
}

/// ffprobe-backed [`DurationProbe`].
pub struct FfprobeDurationProbe {
    ffprobe_path: PathBuf,
}

impl FfprobeDurationProbe {
    pub fn new(tools: &ToolSettings) -> Self {
        Self {
            ffprobe_path: PathBuf::from(&tools.ffprobe),
        }
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn duration_secs(&self, input: &Path) -> Result<f64, ProbeError> {
        tracing::debug!("Probing duration of {}", input.display());

        let output = Command::new(&self.ffprobe_path)
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(input)
            .output()
            .await
            .map_err(|e| ProbeError::Spawn {
                tool: "ffprobe".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Failed {
                tool: "ffprobe".to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration(&stdout)
    }
}

/// Parses ffprobe's bare duration line (e.g. `245.013000`).
fn parse_duration(stdout: &str) -> Result<f64, ProbeError> {
    let trimmed = stdout.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ProbeError::Unparsable(trimmed.to_string()))
}
