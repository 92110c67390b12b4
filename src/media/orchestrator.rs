use super::{
    downloader::Downloader,
    embed::VideoRef,
    error::{DownloadError, ItemError},
    progress::{ItemProgress, NoProgress, ProgressObserver},
    resolver::resolve,
    strategy::{select, Strategy},
    tools::ToolAvailability,
    types::{DownloadOutcome, DownloadStatus, RunReport},
};
use crate::utils::format_bytes;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub const VIDEO_EXTENSION: &str = "mp4";

/// File names found in the output directory when a run starts.
#[derive(Debug, Default)]
pub struct ExistingDownloads {
    names: Vec<String>,
}

impl ExistingDownloads {
    pub async fn scan(dir: &Path) -> Result<Self> {
        let mut names = Vec::new();

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self { names }),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to list output directory {}", dir.display()))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list output directory {}", dir.display()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(Self { names })
    }

    /// Matches on `{post_id}_` prefix and video extension only.
    pub fn contains(&self, post_id: &str) -> bool {
        let prefix = format!("{}_", post_id);
        let suffix = format!(".{}", VIDEO_EXTENSION);
        self.names
            .iter()
            .any(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
    }
}

/// Downloads videos one at a time, falling back through the selected
/// strategies for each item.
pub struct DownloadOrchestrator {
    output_dir: PathBuf,
    tools: ToolAvailability,
    downloaders: Vec<Box<dyn Downloader>>,
    progress: Box<dyn ProgressObserver>,
}

impl DownloadOrchestrator {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        tools: ToolAvailability,
        downloaders: Vec<Box<dyn Downloader>>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            tools,
            downloaders,
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressObserver + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn run(&self, videos: &[VideoRef]) -> Result<RunReport> {
        let existing = ExistingDownloads::scan(&self.output_dir).await?;
        let run_stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let mut report = RunReport::default();

        for (index, video) in videos.iter().enumerate() {
            info!(
                "📹 Processing video {}/{}: {}",
                index + 1,
                videos.len(),
                video.post_id
            );

            let disambiguator = format!("{}-{}", run_stamp, index + 1);
            let outcome = self.process(video, &existing, &disambiguator).await;

            match outcome.status {
                DownloadStatus::Downloaded => info!(
                    "   ✅ Downloaded {} with {} to {} ({})",
                    video.post_id,
                    outcome
                        .strategy_used
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    outcome
                        .path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    format_bytes(outcome.bytes.unwrap_or_default())
                ),
                DownloadStatus::Skipped => info!("   ⏩ Skipping {} - already downloaded", video.post_id),
                DownloadStatus::Failed => warn!(
                    "   ❌ Failed {} after {} attempt(s): {}",
                    video.post_id,
                    outcome.attempts.len(),
                    outcome.error_message().unwrap_or_default()
                ),
            }

            report.push(outcome);
        }

        Ok(report)
    }

    async fn process(
        &self,
        video: &VideoRef,
        existing: &ExistingDownloads,
        disambiguator: &str,
    ) -> DownloadOutcome {
        let post_id = video.post_id.as_str();

        if existing.contains(post_id) {
            return DownloadOutcome::skipped(post_id);
        }

        let Some(resolved) = resolve(video) else {
            return DownloadOutcome::failed(post_id, Vec::new(), ItemError::UrlNotFound);
        };
        info!(
            "   ℹ️  {:?} resolved to {} URL: {}",
            video.kind(),
            resolved.transport,
            resolved.url
        );

        let strategies = select(&resolved, &self.tools);
        let output = self.output_dir.join(format!(
            "{}_{}.{}",
            post_id, disambiguator, VIDEO_EXTENSION
        ));

        let mut attempts = Vec::with_capacity(strategies.len());
        let mut last_error = None;

        for strategy in strategies {
            attempts.push(strategy);
            self.progress.attempt_started(post_id, strategy);

            let result = match self.downloader_for(strategy) {
                Some(downloader) => {
                    downloader
                        .download(
                            &resolved.url,
                            &output,
                            &ItemProgress::new(post_id, self.progress.as_ref()),
                        )
                        .await
                }
                None => Err(DownloadError::ToolUnavailable(strategy)),
            };

            self.progress
                .attempt_finished(post_id, strategy, result.is_ok());

            match result {
                Ok(bytes) => {
                    return DownloadOutcome::downloaded(post_id, strategy, attempts, output, bytes)
                }
                Err(e) => {
                    warn!("   {} failed for {}: {}", strategy, post_id, e);
                    remove_leftover(&output).await;
                    last_error = Some(e);
                }
            }
        }

        let error = match last_error {
            Some(e) => ItemError::Download(e),
            None => ItemError::NoStrategy(resolved.transport),
        };
        DownloadOutcome::failed(post_id, attempts, error)
    }

    fn downloader_for(&self, strategy: Strategy) -> Option<&dyn Downloader> {
        self.downloaders
            .iter()
            .find(|d| d.strategy() == strategy)
            .map(|d| d.as_ref())
    }
}

/// Deletes whatever a failed attempt left at `output` or beside it.
///
/// Tools write fragments such as `<stem>.f137.mp4` next to the final name, and
/// any of them would make the next run's scan treat the post as downloaded.
async fn remove_leftover(output: &Path) {
    let (Some(dir), Some(stem)) = (output.parent(), output.file_stem()) else {
        return;
    };
    let prefix = format!("{}.", stem.to_string_lossy());

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("   Could not list {}: {}", dir.display(), e);
            return;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("   Could not list {}: {}", dir.display(), e);
                break;
            }
        };
        if !entry.file_name().to_string_lossy().starts_with(&prefix) {
            continue;
        }
        if !entry.file_type().await.is_ok_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => warn!("   Removed incomplete file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("   Could not remove {}: {}", path.display(), e),
        }
    }
}
