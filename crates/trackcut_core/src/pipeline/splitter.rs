//! Orchestrates fetch, probe, and extraction for one split request.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use super::errors::{SplitError, SplitResult};
use crate::config::Settings;
use crate::extraction::{
    DurationProbe, FfmpegTranscoder, FfprobeDurationProbe, Segment, SegmentExtractor, Transcoder,
};
use crate::fetch::MediaFetcher;
use crate::naming;
use crate::timeline::{self, CutPlan, RawTimestamp};

/// One split request: where the media lives and where to cut it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    /// Source reference, resolved by the configured [`MediaFetcher`].
    pub source_url: String,

    /// Cut points, in any order and mixed representations.
    pub timestamps: Vec<RawTimestamp>,
}

/// Everything a successful split produced.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Media title as reported by the fetcher.
    pub title: String,

    /// Slug the file names derive from.
    pub slug: String,

    /// Directory holding the segment files.
    pub job_dir: PathBuf,

    /// Finished segments in playback order.
    pub segments: Vec<Segment>,
}

/// The end-to-end pipeline behind every front end.
pub struct Splitter {
    settings: Settings,
    fetcher: Arc<dyn MediaFetcher>,
    transcoder: Arc<dyn Transcoder>,
    probe: Arc<dyn DurationProbe>,
    job_seq: AtomicU64,
}

impl Splitter {
    /// Builds a production splitter from settings and the chosen fetcher.
    pub fn new(settings: Settings, fetcher: Arc<dyn MediaFetcher>) -> Self {
        let transcoder = Arc::new(FfmpegTranscoder::new(&settings.tools, &settings.audio));
        let probe = Arc::new(FfprobeDurationProbe::new(&settings.tools));
        Self {
            settings,
            fetcher,
            transcoder,
            probe,
            job_seq: AtomicU64::new(0),
        }
    }

    /// Replaces the transcoder, primarily for tests.
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Replaces the duration probe, primarily for tests.
    pub fn with_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Runs one request end to end.
    ///
    /// Order of operations: validate the source reference, normalize
    /// timestamps, create a scratch directory, fetch, probe the media
    /// duration, reject cut points past the end, then cut. The scratch
    /// directory is removed on any failure after it was created; on
    /// success it stays, holding the segments.
    pub async fn run(&self, request: &SplitRequest) -> SplitResult<SplitOutcome> {
        self.fetcher.validate_source(&request.source_url)?;
        let plan = timeline::normalize(&request.timestamps)?;

        tracing::info!(
            "Splitting {} into {} segments",
            request.source_url,
            plan.segment_count()
        );

        let job_dir = self.create_job_dir().await?;
        match self.run_in_dir(request, &plan, &job_dir).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                cleanup_job_dir(&job_dir).await;
                Err(e)
            }
        }
    }

    async fn run_in_dir(
        &self,
        request: &SplitRequest,
        plan: &CutPlan,
        job_dir: &Path,
    ) -> SplitResult<SplitOutcome> {
        let fetched = self.fetcher.fetch(&request.source_url, job_dir).await?;
        let slug = naming::slugify(&fetched.title);

        let duration_secs = self.probe.duration_secs(&fetched.path).await?;
        // Offsets are sorted, so only the last one can exceed the duration.
        let last = plan.last_offset();
        if last as f64 >= duration_secs {
            return Err(SplitError::OffsetBeyondDuration {
                offset_secs: last,
                duration_secs,
            });
        }

        let extractor =
            SegmentExtractor::new(Arc::clone(&self.transcoder), &self.settings.audio.format);
        let segments = extractor.extract(&fetched.path, plan, &slug, job_dir).await?;

        Ok(SplitOutcome {
            title: fetched.title,
            slug,
            job_dir: job_dir.to_path_buf(),
            segments,
        })
    }

    /// Creates a unique scratch directory for one request.
    ///
    /// The name combines wall-clock time, process id, and a counter, so
    /// two concurrent requests for the same media never share a
    /// directory.
    async fn create_job_dir(&self) -> SplitResult<PathBuf> {
        let seq = self.job_seq.fetch_add(1, Ordering::SeqCst);
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let name = format!("{}-{}-{}", stamp, std::process::id(), seq);
        let job_dir = Path::new(&self.settings.paths.work_dir).join(name);
        tokio::fs::create_dir_all(&job_dir)
            .await
            .map_err(|e| SplitError::io("creating job directory", e))?;
        Ok(job_dir)
    }
}

/// Best-effort removal of a failed job's scratch directory.
async fn cleanup_job_dir(job_dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(job_dir).await {
        tracing::warn!("Could not clean up {}: {}", job_dir.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use crate::extraction::{ProbeError, TranscodeError, TranscodeJob};
    use crate::fetch::LocalFileFetcher;

    struct WritingTranscoder {
        calls: AtomicUsize,
        fail_at: Option<usize>,
    }

    impl WritingTranscoder {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_at: None,
            }
        }

        fn failing_at(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_at: Some(call),
            }
        }
    }

    #[async_trait]
    impl Transcoder for WritingTranscoder {
        async fn transcode(&self, job: &TranscodeJob) -> Result<(), TranscodeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_at {
                return Err(TranscodeError::Failed {
                    tool: "ffmpeg".to_string(),
                    exit_code: 1,
                    message: "boom".to_string(),
                });
            }
            std::fs::write(&job.output, b"cut").unwrap();
            Ok(())
        }
    }

    struct FixedProbe(f64);

    #[async_trait]
    impl DurationProbe for FixedProbe {
        async fn duration_secs(&self, _input: &Path) -> Result<f64, ProbeError> {
            Ok(self.0)
        }
    }

    fn test_settings(work_dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.paths.work_dir = work_dir.to_string_lossy().into_owned();
        settings
    }

    fn splitter(work_dir: &Path, transcoder: WritingTranscoder, duration: f64) -> Splitter {
        Splitter::new(test_settings(work_dir), Arc::new(LocalFileFetcher))
            .with_transcoder(Arc::new(transcoder))
            .with_probe(Arc::new(FixedProbe(duration)))
    }

    fn entry_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn full_run_produces_ordered_segments() {
        let media = tempfile::tempdir().unwrap();
        let source = media.path().join("My Track.mp3");
        std::fs::write(&source, b"media").unwrap();
        let work = tempfile::tempdir().unwrap();

        let splitter = splitter(work.path(), WritingTranscoder::succeeding(), 300.0);
        let request = SplitRequest {
            source_url: source.to_string_lossy().into_owned(),
            timestamps: vec!["1:30".into(), "0:10".into()],
        };

        let outcome = splitter.run(&request).await.unwrap();

        assert_eq!(outcome.title, "My Track");
        assert_eq!(outcome.slug, "my_track");
        assert_eq!(outcome.segments.len(), 3);
        assert_eq!(outcome.segments[0].file_name, "my_track_segment_1.mp3");
        assert_eq!(outcome.segments[2].file_name, "my_track_segment_3.mp3");
        assert_eq!(outcome.segments[1].start_secs, 10);
        assert!(outcome.job_dir.starts_with(work.path()));
        for segment in &outcome.segments {
            assert!(segment.path.exists());
        }
        // The fetched copy is consumed, the caller's file is not.
        assert!(!outcome.job_dir.join("my_track_source.mp3").exists());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn unusable_timestamps_fail_before_any_scratch_dir() {
        let media = tempfile::tempdir().unwrap();
        let source = media.path().join("a.mp3");
        std::fs::write(&source, b"media").unwrap();
        let work = tempfile::tempdir().unwrap();

        let splitter = splitter(work.path(), WritingTranscoder::succeeding(), 300.0);
        let request = SplitRequest {
            source_url: source.to_string_lossy().into_owned(),
            timestamps: vec!["abc".into()],
        };

        let err = splitter.run(&request).await.unwrap_err();
        assert!(matches!(err, SplitError::Timeline(_)));
        assert_eq!(entry_count(work.path()), 0);
    }

    #[tokio::test]
    async fn cut_points_past_the_end_are_rejected() {
        let media = tempfile::tempdir().unwrap();
        let source = media.path().join("a.mp3");
        std::fs::write(&source, b"media").unwrap();
        let work = tempfile::tempdir().unwrap();

        let splitter = splitter(work.path(), WritingTranscoder::succeeding(), 100.0);
        let request = SplitRequest {
            source_url: source.to_string_lossy().into_owned(),
            timestamps: vec![150.0.into()],
        };

        let err = splitter.run(&request).await.unwrap_err();
        match err {
            SplitError::OffsetBeyondDuration {
                offset_secs,
                duration_secs,
            } => {
                assert_eq!(offset_secs, 150);
                assert_eq!(duration_secs, 100.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The scratch directory was cleaned up with the rejection.
        assert_eq!(entry_count(work.path()), 0);
    }

    #[tokio::test]
    async fn failed_extraction_cleans_the_scratch_dir() {
        let media = tempfile::tempdir().unwrap();
        let source = media.path().join("a.mp3");
        std::fs::write(&source, b"media").unwrap();
        let work = tempfile::tempdir().unwrap();

        let splitter = splitter(work.path(), WritingTranscoder::failing_at(1), 300.0);
        let request = SplitRequest {
            source_url: source.to_string_lossy().into_owned(),
            timestamps: vec![10.0.into(), 90.0.into()],
        };

        let err = splitter.run(&request).await.unwrap_err();
        assert!(matches!(err, SplitError::Extraction(_)));
        assert_eq!(entry_count(work.path()), 0);
    }

    #[tokio::test]
    async fn missing_source_surfaces_not_found() {
        let work = tempfile::tempdir().unwrap();
        let splitter = splitter(work.path(), WritingTranscoder::succeeding(), 300.0);
        let request = SplitRequest {
            source_url: "/definitely/not/here.mp3".to_string(),
            timestamps: vec![10.0.into()],
        };

        let err = splitter.run(&request).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(entry_count(work.path()), 0);
    }

    #[tokio::test]
    async fn repeated_requests_get_distinct_job_dirs() {
        let media = tempfile::tempdir().unwrap();
        let source = media.path().join("Same Title.mp3");
        std::fs::write(&source, b"media").unwrap();
        let work = tempfile::tempdir().unwrap();

        let splitter = splitter(work.path(), WritingTranscoder::succeeding(), 300.0);
        let request = SplitRequest {
            source_url: source.to_string_lossy().into_owned(),
            timestamps: vec![10.0.into()],
        };

        let first = splitter.run(&request).await.unwrap();
        let second = splitter.run(&request).await.unwrap();
        assert_ne!(first.job_dir, second.job_dir);
        assert!(first.job_dir.exists());
        assert!(second.job_dir.exists());
    }
}
