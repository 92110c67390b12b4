use super::strategy::Strategy;
use crate::utils::format_bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Receives progress from the download pipeline.
///
/// External tools only report start and finish; direct streams also report
/// bytes as they arrive.
pub trait ProgressObserver: Send + Sync {
    fn attempt_started(&self, _post_id: &str, _strategy: Strategy) {}

    /// `total` is `None` when the server sent no content length.
    fn bytes_received(&self, _post_id: &str, _received: u64, _total: Option<u64>) {}

    fn attempt_finished(&self, _post_id: &str, _strategy: Strategy, _succeeded: bool) {}
}

/// Progress handle given to a downloader for the item it is fetching.
#[derive(Clone, Copy)]
pub struct ItemProgress<'a> {
    post_id: &'a str,
    observer: &'a dyn ProgressObserver,
}

impl<'a> ItemProgress<'a> {
    pub fn new(post_id: &'a str, observer: &'a dyn ProgressObserver) -> Self {
        Self { post_id, observer }
    }

    pub fn bytes_received(&self, received: u64, total: Option<u64>) {
        self.observer.bytes_received(self.post_id, received, total);
    }
}

/// Ignores every event.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Logs progress through `tracing`, at most once per 10% for known sizes.
#[derive(Default)]
pub struct LogProgress {
    last_decile: AtomicU64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for LogProgress {
    fn attempt_started(&self, post_id: &str, strategy: Strategy) {
        self.last_decile.store(0, Ordering::Relaxed);
        info!("🔄 Downloading {} with {}...", post_id, strategy);
    }

    fn bytes_received(&self, post_id: &str, received: u64, total: Option<u64>) {
        match total {
            Some(total) if total > 0 => {
                let decile = (received.min(total) * 10) / total;
                if decile > self.last_decile.swap(decile, Ordering::Relaxed) {
                    info!(
                        "   {}: {}% | {}/{}",
                        post_id,
                        decile * 10,
                        format_bytes(received),
                        format_bytes(total)
                    );
                }
            }
            _ => debug!("   {}: {} received", post_id, format_bytes(received)),
        }
    }

    fn attempt_finished(&self, post_id: &str, strategy: Strategy, succeeded: bool) {
        debug!(
            "Attempt with {} for {} finished (success: {})",
            strategy, post_id, succeeded
        );
    }
}
