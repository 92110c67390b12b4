use super::{error::ItemError, strategy::Strategy};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    Skipped,
    Failed,
}

#[derive(Debug)]
pub struct DownloadOutcome {
    pub post_id: String,
    pub status: DownloadStatus,
    pub strategy_used: Option<Strategy>,
    /// Every strategy tried for this item, in order.
    pub attempts: Vec<Strategy>,
    pub error: Option<ItemError>,
    pub path: Option<PathBuf>,
    pub bytes: Option<u64>,
}

impl DownloadOutcome {
    pub fn skipped(post_id: &str) -> Self {
        Self {
            post_id: post_id.to_string(),
            status: DownloadStatus::Skipped,
            strategy_used: None,
            attempts: Vec::new(),
            error: None,
            path: None,
            bytes: None,
        }
    }

    pub fn downloaded(
        post_id: &str,
        strategy: Strategy,
        attempts: Vec<Strategy>,
        path: PathBuf,
        bytes: u64,
    ) -> Self {
        Self {
            post_id: post_id.to_string(),
            status: DownloadStatus::Downloaded,
            strategy_used: Some(strategy),
            attempts,
            error: None,
            path: Some(path),
            bytes: Some(bytes),
        }
    }

    pub fn failed(post_id: &str, attempts: Vec<Strategy>, error: ItemError) -> Self {
        Self {
            post_id: post_id.to_string(),
            status: DownloadStatus::Failed,
            strategy_used: None,
            attempts,
            error: Some(error),
            path: None,
            bytes: None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, status: DownloadStatus) {
        match status {
            DownloadStatus::Downloaded => self.downloaded += 1,
            DownloadStatus::Skipped => self.skipped += 1,
            DownloadStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<DownloadOutcome>,
    pub summary: Summary,
}

impl RunReport {
    pub fn push(&mut self, outcome: DownloadOutcome) {
        self.summary.record(outcome.status);
        self.outcomes.push(outcome);
    }
}
