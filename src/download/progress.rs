//! Progress reporting hook for body transfers.

/// Receives transfer progress for a single download.
///
/// Implementations must be cheap; `on_bytes` is called once per received chunk.
pub trait ProgressObserver: Send + Sync {
    /// Transfer of the body is starting; `total` is the Content-Length if known.
    fn on_start(&self, total: Option<u64>);

    /// `len` more bytes were written to the destination.
    fn on_bytes(&self, len: u64);

    /// Transfer ended (successfully or not).
    fn on_finish(&self);
}

/// Observer that ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_start(&self, _total: Option<u64>) {}
    fn on_bytes(&self, _len: u64) {}
    fn on_finish(&self) {}
}
