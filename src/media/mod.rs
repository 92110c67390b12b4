mod direct;
mod downloader;
mod embed;
mod error;
mod ffmpeg;
mod orchestrator;
mod progress;
mod resolver;
mod strategy;
mod tools;
mod types;
mod ytdlp;

pub use downloader::Downloader;
pub use embed::classify;
pub use orchestrator::DownloadOrchestrator;
pub use progress::LogProgress;
pub use tools::ToolAvailability;
pub use types::RunReport;

use crate::config::ToolsConfig;
use direct::DirectDownloader;
use ffmpeg::FfmpegDownloader;
use std::time::Duration;
use tracing::info;
use ytdlp::YtDlpDownloader;

/// One downloader per strategy: ffmpeg remux, yt-dlp extraction, plain HTTP.
pub fn default_downloaders(tools: &ToolsConfig, http: reqwest::Client) -> Vec<Box<dyn Downloader>> {
    let timeout = Duration::from_secs(tools.timeout_secs);

    let downloaders: Vec<Box<dyn Downloader>> = vec![
        Box::new(FfmpegDownloader::new(&tools.ffmpeg, timeout)),
        Box::new(YtDlpDownloader::new(&tools.yt_dlp, timeout)),
        Box::new(DirectDownloader::new(http)),
    ];

    info!(
        "Media downloaders initialized: {}",
        downloaders
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    downloaders
}
