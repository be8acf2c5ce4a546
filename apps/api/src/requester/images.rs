//! Image lookup for generated content.
//!
//! Searches the image API for a query, downloads the first hit into the cache
//! directory, and hands back a reference usable by the renderer. Every failure
//! degrades to a placeholder image; image lookup never fails a generation.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::backoff::{BackoffClient, BackoffPolicy, RequestAttempt};
use crate::config::Config;

pub const PLACEHOLDER_IMAGE: &str =
    "https://placehold.co/600x400/1e293b/e2e8f0?text=Image+Not+Found";

/// URL prefix under which cached images are served.
pub const CACHE_URL_PREFIX: &str = "images";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    urls: HitUrls,
}

#[derive(Debug, Deserialize)]
struct HitUrls {
    regular: String,
}

#[derive(Clone)]
pub struct ImageFinder {
    client: BackoffClient,
    search_url: String,
    access_key: Option<String>,
    cache_dir: PathBuf,
    timeout: Duration,
}

impl ImageFinder {
    pub fn new(client: BackoffClient, config: &Config) -> Self {
        Self {
            client,
            search_url: config.image_search_url.clone(),
            access_key: config.unsplash_access_key.clone(),
            cache_dir: config.image_cache_dir.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the URL of the first search hit, or None when search is not
    /// configured, fails, or finds nothing.
    pub async fn search(&self, query: &str) -> Option<String> {
        let access_key = self.access_key.as_ref()?;

        let request = RequestAttempt::get(&self.search_url, self.timeout)
            .with_header("Authorization", format!("Client-ID {access_key}"))
            .with_query("query", query)
            .with_query("per_page", "1")
            .with_query("orientation", "landscape");

        let response = match self
            .client
            .send(&request, &BackoffPolicy::single_attempt())
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Image search for {query:?} failed: {e}");
                return None;
            }
        };

        match response.json::<SearchResponse>() {
            Ok(parsed) => parsed.results.into_iter().next().map(|hit| hit.urls.regular),
            Err(e) => {
                warn!("Image search for {query:?} returned an unexpected body: {e}");
                None
            }
        }
    }

    /// Resolves `query` to an image reference, caching the file as `file_name`.
    pub async fn resolve(&self, query: &str, file_name: &str) -> String {
        let Some(url) = self.search(query).await else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        match self.download(&url, file_name).await {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Caching image for {query:?} failed: {e}");
                PLACEHOLDER_IMAGE.to_string()
            }
        }
    }

    async fn download(&self, url: &str, file_name: &str) -> anyhow::Result<String> {
        let request = RequestAttempt::get(url, self.timeout);
        let response = self
            .client
            .send(&request, &BackoffPolicy::single_attempt())
            .await?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.cache_dir.join(file_name);
        tokio::fs::write(&path, &response.body).await?;
        debug!("Cached image at {}", path.display());

        Ok(format!("{CACHE_URL_PREFIX}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::testing::ScriptedTransport;
    use crate::config::tests::test_config;

    fn finder(transport: std::sync::Arc<ScriptedTransport>, cache: PathBuf, key: bool) -> ImageFinder {
        let mut config = test_config();
        config.image_cache_dir = cache;
        config.unsplash_access_key = key.then(|| "access".to_string());
        ImageFinder::new(BackoffClient::new(transport), &config)
    }

    const ONE_HIT: &str = r#"{"results":[{"urls":{"regular":"http://cdn.test/a.jpg"}}]}"#;

    #[tokio::test]
    async fn test_no_key_means_placeholder_without_network() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok(ONE_HIT)]);
        let dir = tempfile::tempdir().unwrap();
        let finder = finder(transport.clone(), dir.path().to_path_buf(), false);

        assert_eq!(finder.resolve("sunset", "a.jpg").await, PLACEHOLDER_IMAGE);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_sends_client_id_and_query() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok(ONE_HIT)]);
        let dir = tempfile::tempdir().unwrap();
        let finder = finder(transport.clone(), dir.path().to_path_buf(), true);

        let url = finder.search("sunset").await;

        assert_eq!(url.as_deref(), Some("http://cdn.test/a.jpg"));
        let sent = &transport.requests()[0];
        assert!(sent
            .headers
            .contains(&("Authorization".to_string(), "Client-ID access".to_string())));
        assert!(sent.query.contains(&("query".to_string(), "sunset".to_string())));
    }

    #[tokio::test]
    async fn test_resolve_downloads_into_cache() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::ok(ONE_HIT),
            ScriptedTransport::ok(vec![0xFF, 0xD8, 0xFF]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let finder = finder(transport, cache.clone(), true);

        let reference = finder.resolve("sunset", "slide_0_element_2.jpg").await;

        assert_eq!(reference, "images/slide_0_element_2.jpg");
        let bytes = std::fs::read(cache.join("slide_0_element_2.jpg")).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_empty_results_fall_back_to_placeholder() {
        let transport =
            ScriptedTransport::new(vec![ScriptedTransport::ok(r#"{"results":[]}"#)]);
        let dir = tempfile::tempdir().unwrap();
        let finder = finder(transport, dir.path().to_path_buf(), true);

        assert_eq!(finder.resolve("nothing", "x.jpg").await, PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn test_search_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::status(500, "down")]);
        let dir = tempfile::tempdir().unwrap();
        let finder = finder(transport.clone(), dir.path().to_path_buf(), true);

        assert_eq!(finder.resolve("x", "x.jpg").await, PLACEHOLDER_IMAGE);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_download_falls_back_to_placeholder() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::ok(ONE_HIT),
            ScriptedTransport::status(404, "gone"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let finder = finder(transport, dir.path().to_path_buf(), true);

        assert_eq!(finder.resolve("x", "x.jpg").await, PLACEHOLDER_IMAGE);
    }
}
