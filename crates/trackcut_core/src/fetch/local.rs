//! Local file copy-in.

use std::path::Path;

use async_trait::async_trait;

use super::{FetchError, FetchResult, FetchedMedia, MediaFetcher};
use crate::naming;

/// "Fetches" a file that is already on disk by copying it into the job
/// directory, so the rest of the pipeline behaves exactly as it does
/// for remote sources.
pub struct LocalFileFetcher;

#[async_trait]
impl MediaFetcher for LocalFileFetcher {
    fn name(&self) -> &'static str {
        "local"
    }

    /// Any non-empty path is worth attempting; existence is checked at
    /// fetch time.
    fn validate_source(&self, source: &str) -> FetchResult<()> {
        if source.trim().is_empty() {
            return Err(FetchError::InvalidSource(
                "source path is empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch(&self, source: &str, job_dir: &Path) -> FetchResult<FetchedMedia> {
        let path = Path::new(source.trim());
        if !path.is_file() {
            return Err(FetchError::NotFound(source.to_string()));
        }

        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "untitled".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mp3".to_string());

        let landed = job_dir.join(naming::source_file_name(
            &naming::slugify(&title),
            &extension,
        ));
        tokio::fs::copy(path, &landed)
            .await
            .map_err(|e| FetchError::io("copying local media", e))?;

        tracing::info!("Copied '{}' to {}", title, landed.display());
        Ok(FetchedMedia {
            path: landed,
            title,
        })
    }
}
