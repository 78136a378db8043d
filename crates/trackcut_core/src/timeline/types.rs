//! Input and error types for timeline normalization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One caller-supplied timestamp, before normalization.
///
/// Request payloads mix bare numbers (seconds) with clock strings such
/// as `"1:30"`, so the wire type accepts both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Seconds from the start of the media, possibly fractional.
    Seconds(f64),
    /// Clock text: `"ss"`, `"mm:ss"` or `"hh:mm:ss"`.
    Text(String),
}

impl From<f64> for RawTimestamp {
    fn from(secs: f64) -> Self {
        Self::Seconds(secs)
    }
}

impl From<&str> for RawTimestamp {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Errors surfaced while turning raw timestamps into a cut plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    /// The list was empty, or every entry in it was dropped as unparsable.
    #[error("no valid timestamps were provided")]
    NoValidTimestamps,

    /// An entry parsed cleanly but points before the start of the media.
    #[error("timestamp '{0}' is before the start of the media")]
    NegativeOffset(String),
}

pub type TimelineResult<T> = Result<T, TimelineError>;
