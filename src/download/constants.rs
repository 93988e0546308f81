//! Constants for the download module (timeouts, chunking, routing).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default write buffer size for streaming downloads (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Smallest accepted streaming chunk size (8 KiB).
pub const MIN_CHUNK_SIZE: usize = 8 * 1024;

/// Largest accepted streaming chunk size (4 MiB).
pub const MAX_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// URL substring that routes a request to the bulk strategy.
pub const DATASET_API_MARKER: &str = "dataverse.yale.edu/api/access/dataset";

/// Default extension suggested for bulk (dataset) downloads.
pub const DATASET_EXTENSION: &str = ".zip";
