/// Receives byte counts while a download is copied to disk.
///
/// Updates are delivered inline from the copy loop, so implementations must
/// be cheap.
pub trait ProgressSink: Sync + Send {
    /// Called once before the first chunk. `total` is the `Content-Length`, if any.
    fn begin(&self, total: Option<u64>);
    fn advance(&self, bytes: u64);
    fn finish(&self);
}

/// `ProgressSink` that ignores every update.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&self, _total: Option<u64>) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}
