//! Error type for the end-to-end split pipeline.
//!
//! Errors from every stage collapse into [`SplitError`], which carries
//! enough structure for front ends to map each failure onto an
//! HTTP-style status.

use thiserror::Error;

use crate::extraction::{ExtractionError, ProbeError};
use crate::fetch::FetchError;
use crate::timeline::TimelineError;

/// Any failure of a split request.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to probe media duration: {0}")]
    Probe(#[from] ProbeError),

    /// A requested cut point lies at or past the end of the media.
    #[error("timestamp {offset_secs}s is at or past the end of the media ({duration_secs:.1}s)")]
    OffsetBeyondDuration { offset_secs: u64, duration_secs: f64 },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Scratch-space failure outside the tools themselves.
    #[error("i/o error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// HTTP-style status for this failure.
    ///
    /// 400 for unusable input, 404/403 for missing or gated sources,
    /// 502 for failures talking to the upstream service, and 500 for
    /// anything that broke locally.
    pub fn status_code(&self) -> u16 {
        match self {
            SplitError::Timeline(_) => 400,
            SplitError::OffsetBeyondDuration { .. } => 400,
            SplitError::Fetch(e) => match e {
                FetchError::InvalidSource(_) => 400,
                FetchError::NotFound(_) => 404,
                FetchError::AccessDenied(_) => 403,
                FetchError::Network { .. } | FetchError::ToolFailed { .. } => 502,
                FetchError::Spawn { .. } | FetchError::Io { .. } => 500,
            },
            SplitError::Probe(_) => 500,
            SplitError::Extraction(_) => 500,
            SplitError::Io { .. } => 500,
        }
    }
}

pub type SplitResult<T> = Result<T, SplitError>;
