use super::{
    downloader::{run_tool, Downloader},
    error::DownloadError,
    progress::ItemProgress,
    strategy::Strategy,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

pub struct YtDlpDownloader {
    program: String,
    timeout: Duration,
}

impl YtDlpDownloader {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, url: &str, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--no-warnings")
            .arg("--merge-output-format")
            .arg("mp4")
            .arg("--output")
            .arg(output)
            .arg(url);
        command
    }
}

/// Directory yt-dlp works in for `output`. Its fragments and part files never
/// land beside the finished downloads.
fn staging_dir(output: &Path) -> PathBuf {
    output.with_extension("yt-dlp")
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn strategy(&self) -> Strategy {
        Strategy::ExtractionTool
    }

    async fn download(
        &self,
        url: &str,
        output: &Path,
        _progress: &ItemProgress<'_>,
    ) -> Result<u64, DownloadError> {
        info!("Extracting media with yt-dlp: {}", url);

        let staging = staging_dir(output);
        tokio::fs::create_dir_all(&staging)
            .await
            .map_err(|e| DownloadError::filesystem(&staging, e))?;
        let staged = staging.join("video.mp4");

        let result = match run_tool(self.name(), self.command(url, &staged), &staged, self.timeout)
            .await
        {
            Ok(bytes) => tokio::fs::rename(&staged, output)
                .await
                .map(|()| bytes)
                .map_err(|e| DownloadError::filesystem(output, e)),
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_dir_all(&staging).await {
            debug!("Could not remove {}: {}", staging.display(), e);
        }
        result
    }
}
