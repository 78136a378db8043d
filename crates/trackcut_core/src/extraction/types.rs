//! Types for segment extraction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One finished audio segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based position in listing order.
    pub ordinal: usize,

    /// Bare file name, as reported to callers.
    pub file_name: String,

    /// Full path of the written file.
    pub path: PathBuf,

    /// Start offset in seconds.
    pub start_secs: u64,

    /// Length in seconds, `None` when the segment runs to the end of
    /// the media.
    pub duration_secs: Option<u64>,
}

/// One transcode invocation: cut a window out of `input` into `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub input: PathBuf,
    pub start_secs: u64,
    /// `None` cuts from `start_secs` to the end of the input.
    pub duration_secs: Option<u64>,
    pub output: PathBuf,
}

/// Error from a single transcode invocation.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder binary could not be started at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The transcoder ran and exited unsuccessfully.
    #[error("{tool} exited with code {exit_code}: {message}")]
    Failed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The transcoder reported success but its output file is missing
    /// or empty.
    #[error("output file missing or empty: {}", .0.display())]
    OutputMissing(PathBuf),
}

/// Error from extracting a full plan of segments.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Source media is not on disk where the job expects it.
    #[error("source media not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// One interval failed to cut; `interval` is its 0-based index in
    /// the plan.
    #[error("failed to cut interval {interval}: {source}")]
    Transcode {
        interval: usize,
        #[source]
        source: TranscodeError,
    },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
