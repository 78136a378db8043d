//! The end-to-end split pipeline.
//!
//! One [`Splitter`] serves every front end: it validates the request,
//! fetches the source into a per-job scratch directory, probes the
//! duration, and cuts the segments, cleaning the scratch directory up
//! whenever anything fails.
//!
//! ```text
//! SplitRequest
//!     ├── validate source reference
//!     ├── normalize timestamps -> CutPlan
//!     ├── create job directory
//!     ├── fetch media             (MediaFetcher)
//!     ├── probe duration          (DurationProbe)
//!     └── cut segments            (SegmentExtractor)
//! ```

mod errors;
mod splitter;

pub use errors::{SplitError, SplitResult};
pub use splitter::{SplitOutcome, SplitRequest, Splitter};
