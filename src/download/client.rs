//! HTTP client wrapper for download requests.
//!
//! This module provides the `HttpClient` struct which owns the configured
//! `reqwest` client, maps transport failures and non-2xx statuses into
//! [`DownloadError`], and streams response bodies to disk.

use std::path::Path;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use reqwest::header::HeaderName;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::progress::ProgressObserver;
use crate::user_agent;

/// HTTP client for downloading files.
///
/// Created once and reused, taking advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends a GET request with optional header overrides.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidUrl` if `url` does not parse,
    /// `DownloadError::Network`/`Timeout` on transport failure, and
    /// `DownloadError::HttpStatus` for any non-2xx response.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get(
        &self,
        url: &str,
        headers: &[(HeaderName, &str)],
    ) -> Result<Response, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let mut request = self.client.get(parsed);
        for (name, value) in headers {
            request = request.header(name.clone(), *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        debug!(status = status.as_u16(), "response received");
        Ok(response)
    }
}

/// Writes `head` followed by the rest of `stream` to `path`, returning bytes written.
///
/// The file is written through a buffer of `buffer_size` bytes. A failure
/// mid-transfer leaves whatever was written on disk.
pub(crate) async fn stream_to_file<S, B>(
    path: &Path,
    head: &[u8],
    mut stream: S,
    url: &str,
    buffer_size: usize,
    progress: &dyn ProgressObserver,
) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    let mut bytes_written: u64 = 0;

    if !head.is_empty() {
        writer
            .write_all(head)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += head.len() as u64;
        progress.on_bytes(head.len() as u64);
    }

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                // Bytes already received stay on disk.
                if let Err(flush_err) = writer.flush().await {
                    warn!(path = %path.display(), error = %flush_err, "could not flush partial file");
                }
                warn!(bytes_written, "transfer interrupted; partial file kept");
                return Err(DownloadError::network(url, e));
            }
        };
        let chunk = chunk.as_ref();

        writer
            .write_all(chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        bytes_written += chunk.len() as u64;
        progress.on_bytes(chunk.len() as u64);
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::download::progress::NoProgress;
    use reqwest::header::USER_AGENT;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_invalid_url() {
        let client = HttpClient::new();
        let result = client.get("not-a-valid-url", &[]).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_get_maps_non_success_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get(&format!("{}/error", mock_server.uri()), &[])
            .await;
        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 500),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_sends_default_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header(
                "user-agent",
                user_agent::default_download_user_agent().as_str(),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client.get(&format!("{}/ua", mock_server.uri()), &[]).await;
        assert!(result.is_ok(), "got: {result:?}");
    }

    #[tokio::test]
    async fn test_get_header_override_replaces_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header("user-agent", "custom-agent/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get(
                &format!("{}/ua", mock_server.uri()),
                &[(USER_AGENT, "custom-agent/1.0")],
            )
            .await;
        assert!(result.is_ok(), "got: {result:?}");
    }

    #[tokio::test]
    async fn test_stream_to_file_writes_head_then_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.bin");
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> =
            vec![Ok(b"world".to_vec()), Ok(b"!".to_vec())];

        let written = stream_to_file(
            &target,
            b"hello ",
            futures_util::stream::iter(chunks),
            "https://example.com",
            8 * 1024,
            &NoProgress,
        )
        .await
        .unwrap();

        assert_eq!(written, 12);
        assert_eq!(std::fs::read(&target).unwrap(), b"hello world!");
    }

    #[tokio::test]
    async fn test_stream_to_file_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("no-such-dir").join("out.bin");
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> = Vec::new();

        let result = stream_to_file(
            &target,
            b"x",
            futures_util::stream::iter(chunks),
            "https://example.com",
            8 * 1024,
            &NoProgress,
        )
        .await;
        assert!(matches!(result, Err(DownloadError::Io { .. })));
    }
}
