//! yt-dlp backed fetching for streaming sites.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::{FetchError, FetchResult, FetchedMedia, MediaFetcher};
use crate::config::{AudioSettings, ToolSettings};
use crate::naming;

/// Fetches sources through yt-dlp, extracting the audio track in the
/// configured format.
pub struct YtDlpFetcher {
    ytdlp_path: PathBuf,
    audio_format: String,
}

impl YtDlpFetcher {
    pub fn new(tools: &ToolSettings, audio: &AudioSettings) -> Self {
        Self {
            ytdlp_path: PathBuf::from(&tools.ytdlp),
            audio_format: audio.format.clone(),
        }
    }

    /// Builds the yt-dlp argument list for one download.
    ///
    /// `--print after_move:filepath` makes yt-dlp report the final file
    /// location on stdout, and `--no-simulate` keeps the download
    /// running despite the print.
    fn build_args(&self, source: &str, job_dir: &Path) -> Vec<OsString> {
        let template = job_dir.join("%(title)s.%(ext)s");
        vec![
            "-f".into(),
            "bestaudio/best".into(),
            "-x".into(),
            "--audio-format".into(),
            self.audio_format.clone().into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--no-simulate".into(),
            "--print".into(),
            "after_move:filepath".into(),
            "-o".into(),
            template.into_os_string(),
            source.to_string().into(),
        ]
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, source: &str, job_dir: &Path) -> FetchResult<FetchedMedia> {
        let args = self.build_args(source, job_dir);
        tracing::info!("Fetching {} via yt-dlp", source);

        let output = Command::new(&self.ytdlp_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| FetchError::Spawn {
                tool: "yt-dlp".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(
                source,
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| FetchError::ToolFailed {
                tool: "yt-dlp".to_string(),
                exit_code: 0,
                message: "no output path was reported".to_string(),
            })?;
        let downloaded = PathBuf::from(reported);

        let title = downloaded
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "untitled".to_string());

        // Re-home the download under the slug so every later file name
        // derives from the same rule.
        let extension = downloaded
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.audio_format.clone());
        let landed = job_dir.join(naming::source_file_name(
            &naming::slugify(&title),
            &extension,
        ));
        tokio::fs::rename(&downloaded, &landed)
            .await
            .map_err(|e| FetchError::io("renaming downloaded media", e))?;

        tracing::info!("Fetched '{}' to {}", title, landed.display());
        Ok(FetchedMedia {
            path: landed,
            title,
        })
    }
}

/// Maps a failed yt-dlp run to the closest error category.
///
/// yt-dlp reports almost everything on stderr with exit code 1, so the
/// text is the only signal available.
fn classify_failure(source: &str, exit_code: i32, stderr: &str) -> FetchError {
    let lowered = stderr.to_lowercase();

    if lowered.contains("unsupported url") {
        return FetchError::InvalidSource(format!("'{source}' is not a supported source"));
    }
    if lowered.contains("private video")
        || lowered.contains("sign in")
        || lowered.contains("members-only")
        || lowered.contains("http error 403")
    {
        return FetchError::AccessDenied(source.to_string());
    }
    if lowered.contains("video unavailable")
        || lowered.contains("has been removed")
        || lowered.contains("does not exist")
        || lowered.contains("http error 404")
        || lowered.contains("http error 410")
    {
        return FetchError::NotFound(source.to_string());
    }
    if lowered.contains("unable to download")
        || lowered.contains("timed out")
        || lowered.contains("connection")
        || lowered.contains("name or service not known")
        || lowered.contains("temporary failure in name resolution")
    {
        return FetchError::Network {
            url: source.to_string(),
            message: stderr.to_string(),
        };
    }
    FetchError::ToolFailed {
        tool: "yt-dlp".to_string(),
        exit_code,
        message: stderr.to_string(),
    }
}
