//! Timestamp normalization.
//!
//! Callers supply a mixed list of second counts and clock strings; the
//! normalizer reduces them to a sorted, deduplicated list of whole-second
//! cut offsets that always begins at 0.

mod plan;
mod types;

pub use plan::{CutPlan, Interval};
pub use types::{RawTimestamp, TimelineError, TimelineResult};

/// Normalizes raw timestamps into a [`CutPlan`].
///
/// Fractional seconds floor to whole seconds. Entries that fail to parse
/// are dropped with a debug log; an entry that parses to a negative
/// offset rejects the whole request instead. With nothing parsable left,
/// [`TimelineError::NoValidTimestamps`] is returned.
pub fn normalize(raw: &[RawTimestamp]) -> TimelineResult<CutPlan> {
    let mut offsets = Vec::with_capacity(raw.len());
    for entry in raw {
        match parse_entry(entry)? {
            Some(secs) => offsets.push(secs),
            None => tracing::debug!("Dropping unparsable timestamp: {:?}", entry),
        }
    }
    CutPlan::new(offsets)
}

/// Parses one entry to whole seconds. `Ok(None)` means the entry is
/// unparsable and should be dropped.
fn parse_entry(entry: &RawTimestamp) -> TimelineResult<Option<u64>> {
    let secs = match entry {
        RawTimestamp::Seconds(secs) => {
            if !secs.is_finite() {
                return Ok(None);
            }
            *secs
        }
        RawTimestamp::Text(text) => match parse_clock(text) {
            Some(secs) => secs,
            None => return Ok(None),
        },
    };
    if secs < 0.0 {
        return Err(TimelineError::NegativeOffset(entry_text(entry)));
    }
    Ok(Some(secs.floor() as u64))
}

fn entry_text(entry: &RawTimestamp) -> String {
    match entry {
        RawTimestamp::Seconds(secs) => secs.to_string(),
        RawTimestamp::Text(text) => text.clone(),
    }
}

/// Parses `"ss"`, `"mm:ss"` or `"hh:mm:ss"` clock text into seconds.
///
/// Components are not range-checked, so `"1:90"` is a valid 150 seconds.
fn parse_clock(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut total = 0.0_f64;
    for part in parts {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        total = total * 60.0 + value;
    }
    Some(total)
}

/// Formats a second offset as clock text for reports.
pub fn format_offset(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
