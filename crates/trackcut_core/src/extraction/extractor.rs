//! Drives the per-interval cuts for one job.
//!
//! Segments are produced strictly in playback order and the batch is
//! all-or-nothing: a failed interval removes every segment already
//! written before the error is reported.

use std::path::Path;
use std::sync::Arc;

use super::ffmpeg::Transcoder;
use super::types::{ExtractionError, ExtractionResult, Segment, TranscodeJob};
use crate::naming;
use crate::timeline::CutPlan;

pub struct SegmentExtractor {
    transcoder: Arc<dyn Transcoder>,
    extension: String,
}

impl SegmentExtractor {
    pub fn new(transcoder: Arc<dyn Transcoder>, extension: impl Into<String>) -> Self {
        Self {
            transcoder,
            extension: extension.into(),
        }
    }

    /// Cuts every interval of `plan` out of `source` into `output_dir`.
    ///
    /// On success the source file is deleted and the finished segments
    /// are returned in playback order. On any transcode failure the
    /// segments written so far and the source file are both removed
    /// before the error is returned; nothing of the job stays on disk.
    pub async fn extract(
        &self,
        source: &Path,
        plan: &CutPlan,
        slug: &str,
        output_dir: &Path,
    ) -> ExtractionResult<Vec<Segment>> {
        if !source.exists() {
            return Err(ExtractionError::SourceMissing(source.to_path_buf()));
        }

        tracing::info!(
            "Cutting {} into {} segments",
            source.display(),
            plan.segment_count()
        );

        let mut finished: Vec<Segment> = Vec::with_capacity(plan.segment_count());
        for interval in plan.intervals() {
            let ordinal = interval.index + 1;
            let file_name = naming::segment_file_name(slug, ordinal, &self.extension);
            let output = output_dir.join(&file_name);

            let job = TranscodeJob {
                input: source.to_path_buf(),
                start_secs: interval.start_secs,
                duration_secs: interval.duration_secs,
                output: output.clone(),
            };

            if let Err(e) = self.transcoder.transcode(&job).await {
                // The failed attempt may have left a partial file behind.
                let _ = tokio::fs::remove_file(&output).await;
                rollback(&finished, source).await;
                return Err(ExtractionError::Transcode {
                    interval: interval.index,
                    source: e,
                });
            }

            finished.push(Segment {
                ordinal,
                file_name,
                path: output,
                start_secs: interval.start_secs,
                duration_secs: interval.duration_secs,
            });
        }

        if let Err(e) = tokio::fs::remove_file(source).await {
            tracing::warn!("Could not remove source {}: {}", source.display(), e);
        }

        tracing::info!("Wrote {} segments to {}", finished.len(), output_dir.display());
        Ok(finished)
    }
}

/// Removes already-written segments and the source after a failed
/// interval.
async fn rollback(finished: &[Segment], source: &Path) {
    for segment in finished {
        if let Err(e) = tokio::fs::remove_file(&segment.path).await {
            tracing::warn!(
                "Rollback could not remove {}: {}",
                segment.path.display(),
                e
            );
        }
    }
    if let Err(e) = tokio::fs::remove_file(source).await {
        tracing::warn!(
            "Rollback could not remove source {}: {}",
            source.display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::extraction::types::TranscodeError;

    /// Writes a marker file per job, optionally failing at one call.
    struct ScriptedTranscoder {
        jobs: Mutex<Vec<TranscodeJob>>,
        calls: AtomicUsize,
        fail_at: Option<usize>,
        write_before_fail: bool,
    }

    impl ScriptedTranscoder {
        fn succeeding() -> Self {
            Self {
                jobs: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                fail_at: None,
                write_before_fail: false,
            }
        }

        fn failing_at(call: usize) -> Self {
            Self {
                fail_at: Some(call),
                ..Self::succeeding()
            }
        }

        fn failing_with_partial_at(call: usize) -> Self {
            Self {
                write_before_fail: true,
                ..Self::failing_at(call)
            }
        }
    }

    #[async_trait]
    impl Transcoder for ScriptedTranscoder {
        async fn transcode(&self, job: &TranscodeJob) -> Result<(), TranscodeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.jobs.lock().unwrap().push(job.clone());
            if Some(call) == self.fail_at {
                if self.write_before_fail {
                    std::fs::write(&job.output, b"partial").unwrap();
                }
                return Err(TranscodeError::Failed {
                    tool: "ffmpeg".to_string(),
                    exit_code: 1,
                    message: "boom".to_string(),
                });
            }
            std::fs::write(&job.output, b"segment").unwrap();
            Ok(())
        }
    }

    fn plan() -> CutPlan {
        CutPlan::new(vec![0, 10, 90]).unwrap()
    }

    #[tokio::test]
    async fn cuts_all_intervals_and_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix_source.mp3");
        std::fs::write(&source, b"media").unwrap();

        let transcoder = Arc::new(ScriptedTranscoder::succeeding());
        let extractor = SegmentExtractor::new(transcoder.clone(), "mp3");
        let segments = extractor
            .extract(&source, &plan(), "mix", dir.path())
            .await
            .unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].file_name, "mix_segment_1.mp3");
        assert_eq!(segments[2].file_name, "mix_segment_3.mp3");
        assert_eq!(segments[1].start_secs, 10);
        assert_eq!(segments[1].duration_secs, Some(80));
        assert_eq!(segments[2].duration_secs, None);
        for segment in &segments {
            assert!(segment.path.exists());
        }
        assert!(!source.exists());

        let jobs = transcoder.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].start_secs, 0);
        assert_eq!(jobs[2].duration_secs, None);
    }

    #[tokio::test]
    async fn failed_interval_rolls_back_earlier_segments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix_source.mp3");
        std::fs::write(&source, b"media").unwrap();

        let transcoder = Arc::new(ScriptedTranscoder::failing_at(1));
        let extractor = SegmentExtractor::new(transcoder, "mp3");
        let err = extractor
            .extract(&source, &plan(), "mix", dir.path())
            .await
            .unwrap_err();

        match err {
            ExtractionError::Transcode { interval, .. } => assert_eq!(interval, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("mix_segment_1.mp3").exists());
        assert!(!dir.path().join("mix_segment_2.mp3").exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn partial_output_from_failed_interval_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix_source.mp3");
        std::fs::write(&source, b"media").unwrap();

        let transcoder = Arc::new(ScriptedTranscoder::failing_with_partial_at(2));
        let extractor = SegmentExtractor::new(transcoder, "mp3");
        let err = extractor
            .extract(&source, &plan(), "mix", dir.path())
            .await
            .unwrap_err();

        match err {
            ExtractionError::Transcode { interval, .. } => assert_eq!(interval, 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("mix_segment_3.mp3").exists());
        assert!(!dir.path().join("mix_segment_1.mp3").exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn stale_output_files_are_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix_source.mp3");
        std::fs::write(&source, b"media").unwrap();
        // Leftover from an interrupted earlier run at the same path.
        let stale = dir.path().join("mix_segment_1.mp3");
        std::fs::write(&stale, b"stale").unwrap();

        let transcoder = Arc::new(ScriptedTranscoder::succeeding());
        let extractor = SegmentExtractor::new(transcoder, "mp3");
        let segments = extractor
            .extract(&source, &plan(), "mix", dir.path())
            .await
            .unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(std::fs::read(&stale).unwrap(), b"segment");
    }

    #[tokio::test]
    async fn missing_source_is_rejected_before_any_cut() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(ScriptedTranscoder::succeeding());
        let extractor = SegmentExtractor::new(transcoder.clone(), "mp3");
        let err = extractor
            .extract(&dir.path().join("gone.mp3"), &plan(), "mix", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::SourceMissing(_)));
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn source_removal_failure_still_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be removed with remove_file, so deleting
        // the "source" fails while every cut succeeds.
        let source = dir.path().join("mix_source.mp3");
        std::fs::create_dir(&source).unwrap();

        let transcoder = Arc::new(ScriptedTranscoder::succeeding());
        let extractor = SegmentExtractor::new(transcoder, "mp3");
        let segments = extractor
            .extract(&source, &plan(), "mix", dir.path())
            .await
            .unwrap();

        assert_eq!(segments.len(), 3);
        assert!(source.exists());
    }
}
