//! The normalized cut plan and its interval view.

use super::types::{TimelineError, TimelineResult};

/// Sorted, deduplicated cut offsets in whole seconds, always starting at 0.
///
/// A plan with N offsets describes N segments: each offset starts a
/// segment that runs to the next offset, and the last segment runs to
/// the end of the media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutPlan {
    offsets: Vec<u64>,
}

impl CutPlan {
    /// Builds a plan from parsed offsets.
    ///
    /// Offsets are sorted and deduplicated, and a leading 0 is inserted
    /// when the earliest offset is later than the start.
    pub fn new(mut offsets: Vec<u64>) -> TimelineResult<Self> {
        if offsets.is_empty() {
            return Err(TimelineError::NoValidTimestamps);
        }
        offsets.sort_unstable();
        offsets.dedup();
        if offsets[0] != 0 {
            offsets.insert(0, 0);
        }
        Ok(Self { offsets })
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of segments the plan produces.
    pub fn segment_count(&self) -> usize {
        self.offsets.len()
    }

    /// The latest cut point, checked against the media duration before
    /// any extraction starts.
    pub fn last_offset(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Iterates the cut intervals in playback order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.offsets.iter().enumerate().map(|(index, &start_secs)| Interval {
            index,
            start_secs,
            duration_secs: self.offsets.get(index + 1).map(|&next| next - start_secs),
        })
    }
}

/// One cut interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// 0-based position in the plan, used in failure reports.
    pub index: usize,
    /// Start offset in seconds.
    pub start_secs: u64,
    /// Length in seconds, or `None` for the final interval which runs
    /// to the end of the media.
    pub duration_secs: Option<u64>,
}
