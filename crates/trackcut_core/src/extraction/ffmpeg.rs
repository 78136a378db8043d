//! Low-level ffmpeg command wrapper.
//!
//! Each cut interval becomes one ffmpeg invocation that seeks into the
//! source and re-encodes the audio window to its own file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::types::{TranscodeError, TranscodeJob};
use crate::config::{AudioSettings, ToolSettings};

/// Runs one cut job against the source media.
///
/// The extractor drives jobs strictly one at a time, so implementations
/// never see overlapping invocations for the same job directory.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, job: &TranscodeJob) -> Result<(), TranscodeError>;
}

/// The production [`Transcoder`], shelling out to ffmpeg.
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    codec: String,
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(tools: &ToolSettings, audio: &AudioSettings) -> Self {
        Self {
            ffmpeg_path: PathBuf::from(&tools.ffmpeg),
            codec: audio.codec.clone(),
            bitrate: audio.bitrate.clone(),
        }
    }

    /// Builds the argument list for one job.
    ///
    /// `-ss` sits before `-i` for input-side seeking, `-y` overwrites
    /// leftovers from an interrupted earlier run, and `-vn` drops any
    /// video stream so the output carries audio only. The final interval
    /// of a plan has no duration and gets no `-t`.
    fn build_args(&self, job: &TranscodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-y".into(),
            "-ss".into(),
            job.start_secs.to_string().into(),
            "-i".into(),
            job.input.as_os_str().to_os_string(),
        ];
        if let Some(duration) = job.duration_secs {
            args.push("-t".into());
            args.push(duration.to_string().into());
        }
        args.push("-vn".into());
        args.push("-acodec".into());
        args.push(self.codec.clone().into());
        args.push("-b:a".into());
        args.push(self.bitrate.clone().into());
        args.push(job.output.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<(), TranscodeError> {
        let args = self.build_args(job);
        tracing::debug!(
            "Running: {} {}",
            self.ffmpeg_path.display(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| TranscodeError::Spawn {
                tool: "ffmpeg".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::Failed {
                tool: "ffmpeg".to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: stderr.trim().to_string(),
            });
        }

        verify_output(&job.output).await?;

        tracing::debug!("Cut {} at {}s", job.output.display(), job.start_secs);
        Ok(())
    }
}

/// Checks that the transcoder produced a non-empty file. ffmpeg can exit
/// 0 having written only a container header for a degenerate window.
async fn verify_output(path: &Path) -> Result<(), TranscodeError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(TranscodeError::OutputMissing(path.to_path_buf())),
    }
}
