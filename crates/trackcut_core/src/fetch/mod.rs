//! Bringing source media onto local disk.
//!
//! A [`MediaFetcher`] turns a caller-supplied source reference into a
//! local file inside the job directory, together with the media title
//! that names everything downstream. Three implementations exist:
//! yt-dlp for streaming sites, direct HTTP download for plain audio
//! URLs, and local file copy-in.

mod http;
mod local;
mod ytdlp;

pub use http::HttpFetcher;
pub use local::LocalFileFetcher;
pub use ytdlp::YtDlpFetcher;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A fetched source: where it landed and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    /// Local path of the media file, inside the job directory.
    pub path: PathBuf,

    /// Human-readable title, before slugging.
    pub title: String,
}

/// Errors surfaced while bringing a source onto local disk.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source reference itself is unusable.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// The source does not exist upstream.
    #[error("source not found: {0}")]
    NotFound(String),

    /// The source exists but is not accessible.
    #[error("access to source denied: {0}")]
    AccessDenied(String),

    /// The network failed underneath the fetch.
    #[error("network failure fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The fetch tool could not be started at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The fetch tool ran and exited unsuccessfully for a reason that
    /// could not be classified further.
    #[error("{tool} exited with code {exit_code}: {message}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Local filesystem error while landing the media.
    #[error("i/o error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Fetches one source into a job directory.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Short tool name for logs.
    fn name(&self) -> &'static str;

    /// Cheap syntactic validation, run before any scratch directory is
    /// created.
    ///
    /// The default accepts absolute `http`/`https` URLs only; fetchers
    /// with broader inputs override it.
    fn validate_source(&self, source: &str) -> FetchResult<()> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(FetchError::InvalidSource("source URL is empty".to_string()));
        }
        let url = Url::parse(trimmed)
            .map_err(|e| FetchError::InvalidSource(format!("'{trimmed}': {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FetchError::InvalidSource(format!(
                "unsupported URL scheme '{other}'"
            ))),
        }
    }

    /// Brings the source onto disk inside `job_dir`.
    async fn fetch(&self, source: &str, job_dir: &Path) -> FetchResult<FetchedMedia>;
}
