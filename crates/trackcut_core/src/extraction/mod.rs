//! Cutting fetched media into per-interval segment files.
//!
//! This module provides:
//! - **Transcoding**: one ffmpeg invocation per cut interval
//! - **Probing**: media duration lookup via ffprobe
//! - **Extraction**: the ordered, all-or-nothing cut loop for one job
//!
//! # Example
//!
//! ```ignore
//! use trackcut_core::extraction::{FfmpegTranscoder, SegmentExtractor};
//!
//! let transcoder = Arc::new(FfmpegTranscoder::new(&settings.tools, &settings.audio));
//! let extractor = SegmentExtractor::new(transcoder, &settings.audio.format);
//! let segments = extractor.extract(&source, &plan, &slug, &job_dir).await?;
//! ```

mod extractor;
mod ffmpeg;
mod probe;
mod types;

pub use extractor::SegmentExtractor;
pub use ffmpeg::{FfmpegTranscoder, Transcoder};
pub use probe::{DurationProbe, FfprobeDurationProbe, ProbeError};
pub use types::{ExtractionError, ExtractionResult, Segment, TranscodeError, TranscodeJob};
