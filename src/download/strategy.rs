//! Fetch strategies and their selection.
//!
//! A [`FetchStrategy`] owns one way of turning a URL into a saved file:
//! which request to send, how the body is read, how the file is named, and
//! how it is written. The [`StrategyRegistry`] picks the first strategy whose
//! predicate accepts the URL, trying specialized strategies before the
//! fallback.
//!
//! - [`BulkStrategy`] - dataset API endpoints; whole body in memory, browser User-Agent
//! - [`StreamingStrategy`] - everything else; chunked read-to-disk with signature sniffing

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{debug, info, instrument};

use super::client::{HttpClient, stream_to_file};
use super::constants::{DATASET_API_MARKER, DATASET_EXTENSION, DEFAULT_CHUNK_SIZE};
use super::destination::{DestinationChooser, SaveSuggestion, apply_default_extension};
use super::error::DownloadError;
use super::filename::{extension_of, resolve_dataset_filename, resolve_filename};
use super::progress::ProgressObserver;
use super::signature::{self, SNIFF_LEN};
use crate::user_agent::BULK_BROWSER_USER_AGENT;

/// Identifies which kind of strategy handled a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Entire body fetched into memory before writing.
    Bulk,
    /// Body read and written in bounded chunks.
    Streaming,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulk => write!(f, "bulk"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}

/// Ordering of strategies during selection.
///
/// Derives `Ord` so that `Specialized < Fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrategyPriority {
    /// Matches a narrow set of URLs.
    Specialized = 0,
    /// Matches anything.
    Fallback = 1,
}

/// Everything a strategy needs to run one download.
pub struct FetchContext<'a> {
    /// Shared HTTP client.
    pub client: &'a HttpClient,
    /// URL being downloaded.
    pub url: &'a str,
    /// Picks the save path.
    pub chooser: &'a (dyn DestinationChooser + Sync),
    /// Receives transfer progress.
    pub progress: &'a dyn ProgressObserver,
}

/// Terminal result of a strategy run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The body was written to this path.
    Saved(PathBuf),
    /// The chooser declined to pick a path; nothing was written.
    Cancelled,
}

/// One way of fetching a URL and saving its body.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Which kind of strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Selection order relative to other strategies.
    fn priority(&self) -> StrategyPriority;

    /// Returns true if this strategy should handle `url`.
    fn matches(&self, url: &str) -> bool;

    /// Fetches `ctx.url` and saves it where the chooser says.
    ///
    /// `filename` is updated as the name becomes known (resolved name first,
    /// then the chosen path) so a failure can be recorded against it.
    async fn fetch(
        &self,
        ctx: &FetchContext<'_>,
        filename: &mut Option<String>,
    ) -> Result<FetchResult, DownloadError>;
}

/// Asks the chooser for a path and applies the default extension.
fn choose_destination(
    ctx: &FetchContext<'_>,
    suggestion: &SaveSuggestion,
    filename: &mut Option<String>,
) -> Option<PathBuf> {
    let chosen = ctx.chooser.choose(suggestion)?;
    let path = apply_default_extension(chosen, &suggestion.default_extension);
    *filename = Some(path.display().to_string());
    Some(path)
}

/// Dataset API strategy: browser User-Agent, whole body in memory, one write.
#[derive(Debug, Clone)]
pub struct BulkStrategy {
    markers: Vec<String>,
}

impl Default for BulkStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkStrategy {
    /// Matches the dataset API marker.
    #[must_use]
    pub fn new() -> Self {
        Self::with_markers([DATASET_API_MARKER])
    }

    /// Matches any URL containing one of `markers`.
    #[must_use]
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl FetchStrategy for BulkStrategy {
    fn name(&self) -> &'static str {
        "bulk"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Bulk
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Specialized
    }

    fn matches(&self, url: &str) -> bool {
        self.markers.iter().any(|marker| url.contains(marker.as_str()))
    }

    #[instrument(skip(self, ctx, filename), fields(url = %ctx.url))]
    async fn fetch(
        &self,
        ctx: &FetchContext<'_>,
        filename: &mut Option<String>,
    ) -> Result<FetchResult, DownloadError> {
        info!("dataset API URL detected; fetching whole body");
        let response = ctx
            .client
            .get(
                ctx.url,
                &[(USER_AGENT, BULK_BROWSER_USER_AGENT), (ACCEPT, "*/*")],
            )
            .await?;

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(ctx.url, e))?;

        let name = resolve_dataset_filename(&headers);
        debug!(filename = %name, bytes = body.len(), "body received");
        *filename = Some(name.clone());

        let suggestion = SaveSuggestion {
            filename: name,
            default_extension: DATASET_EXTENSION.to_string(),
        };
        let Some(path) = choose_destination(ctx, &suggestion, filename) else {
            return Ok(FetchResult::Cancelled);
        };

        info!(path = %path.display(), "writing file");
        ctx.progress.on_start(Some(body.len() as u64));
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;
        ctx.progress.on_bytes(body.len() as u64);

        Ok(FetchResult::Saved(path))
    }
}

/// General strategy: chunked read-to-disk, extension sniffed from the first bytes.
#[derive(Debug, Clone)]
pub struct StreamingStrategy {
    chunk_size: usize,
}

impl Default for StreamingStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl StreamingStrategy {
    /// Creates a streaming strategy writing through a `chunk_size` buffer.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

#[async_trait]
impl FetchStrategy for StreamingStrategy {
    fn name(&self) -> &'static str {
        "streaming"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Streaming
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Fallback
    }

    fn matches(&self, _url: &str) -> bool {
        true
    }

    #[instrument(skip(self, ctx, filename), fields(url = %ctx.url))]
    async fn fetch(
        &self,
        ctx: &FetchContext<'_>,
        filename: &mut Option<String>,
    ) -> Result<FetchResult, DownloadError> {
        let response = ctx.client.get(ctx.url, &[]).await?;
        let headers = response.headers().clone();
        let content_length = response.content_length();
        let mut stream = response.bytes_stream();

        // Buffer enough of the body to sniff its signature before naming it.
        let mut head = Vec::with_capacity(SNIFF_LEN);
        while head.len() < SNIFF_LEN {
            match stream.next().await {
                Some(chunk) => {
                    head.extend_from_slice(&chunk.map_err(|e| DownloadError::network(ctx.url, e))?);
                }
                None => break,
            }
        }

        let mut name = resolve_filename(&headers, ctx.url);
        let mut extension = extension_of(&name);
        if extension.is_none() {
            let sniffed = signature::detect(&head);
            if !sniffed.is_empty() {
                debug!(extension = sniffed, "extension detected from file signature");
                name.push_str(sniffed);
                extension = Some(sniffed.to_string());
            }
        }
        *filename = Some(name.clone());

        let suggestion = SaveSuggestion {
            filename: name,
            default_extension: extension.unwrap_or_default(),
        };
        let Some(path) = choose_destination(ctx, &suggestion, filename) else {
            return Ok(FetchResult::Cancelled);
        };

        info!(path = %path.display(), "streaming to file");
        ctx.progress.on_start(content_length);
        let bytes = stream_to_file(&path, &head, stream, ctx.url, self.chunk_size, ctx.progress)
            .await?;
        debug!(bytes, "stream finished");

        Ok(FetchResult::Saved(path))
    }
}

/// Priority-ordered collection of fetch strategies.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_CHUNK_SIZE)
    }
}

impl StrategyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates the standard registry: bulk for the dataset API, streaming for the rest.
    #[must_use]
    pub fn with_defaults(chunk_size: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BulkStrategy::new()));
        registry.register(Box::new(StreamingStrategy::new(chunk_size)));
        registry
    }

    /// Registers a strategy.
    pub fn register(&mut self, strategy: Box<dyn FetchStrategy>) {
        debug!(
            name = strategy.name(),
            priority = ?strategy.priority(),
            "registering fetch strategy"
        );
        self.strategies.push(strategy);
    }

    /// Returns the number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if no strategies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns the strategy that should handle `url`.
    ///
    /// Specialized strategies win over the fallback; within a priority,
    /// registration order decides.
    #[must_use]
    pub fn select(&self, url: &str) -> Option<&dyn FetchStrategy> {
        self.strategies
            .iter()
            .filter(|s| s.matches(url))
            .min_by_key(|s| s.priority())
            .map(AsRef::as_ref)
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}
