//! Wire-facing response shapes.
//!
//! Front ends report results in one fixed JSON shape, whatever
//! transport they sit behind.

use serde::{Deserialize, Serialize};

use crate::pipeline::{SplitError, SplitOutcome};

/// Success payload: the produced segment file names in playback order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    pub success: bool,
    pub segments: Vec<String>,
}

impl SplitResponse {
    pub fn from_outcome(outcome: &SplitOutcome) -> Self {
        Self {
            success: true,
            segments: outcome
                .segments
                .iter()
                .map(|s| s.file_name.clone())
                .collect(),
        }
    }
}

/// Failure payload, paired with [`SplitError::status_code`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn from_error(err: &SplitError) -> Self {
        Self {
            error: true,
            message: err.to_string(),
        }
    }
}
