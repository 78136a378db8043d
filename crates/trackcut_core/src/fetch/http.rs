//! Direct HTTP(S) download of already-encoded audio files.

use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::{FetchError, FetchResult, FetchedMedia, MediaFetcher};
use crate::naming;

/// Fetches a source by streaming the response body straight to disk.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, source: &str, job_dir: &Path) -> FetchResult<FetchedMedia> {
        let url = Url::parse(source.trim())
            .map_err(|e| FetchError::InvalidSource(format!("'{source}': {e}")))?;
        let (title, extension) = title_and_extension(&url);

        tracing::info!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: source.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Err(FetchError::NotFound(source.to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::AccessDenied(source.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Network {
                url: source.to_string(),
                message: format!("server responded with {status}"),
            });
        }

        let landed = job_dir.join(naming::source_file_name(
            &naming::slugify(&title),
            &extension,
        ));
        let mut file = tokio::fs::File::create(&landed)
            .await
            .map_err(|e| FetchError::io("creating download file", e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network {
                url: source.to_string(),
                message: e.to_string(),
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::io("writing download file", e))?;
        }
        file.flush()
            .await
            .map_err(|e| FetchError::io("flushing download file", e))?;

        tracing::info!("Downloaded '{}' to {}", title, landed.display());
        Ok(FetchedMedia {
            path: landed,
            title,
        })
    }
}

/// Derives a title and file extension from the final URL path segment.
fn title_and_extension(url: &Url) -> (String, String) {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let name = Path::new(segment);
    let title = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "download".to_string());
    let extension = name
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp3".to_string());
    (title, extension)
}
