use super::{
    downloader::{run_tool, Downloader},
    error::DownloadError,
    progress::ItemProgress,
    strategy::Strategy,
};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

// Some video hosts reject ffmpeg's default Lavf user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Copies an HLS stream into a single MP4 without re-encoding.
pub struct FfmpegDownloader {
    program: String,
    timeout: Duration,
}

impl FfmpegDownloader {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, url: &str, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-reconnect")
            .arg("1")
            .arg("-reconnect_streamed")
            .arg("1")
            .arg("-reconnect_delay_max")
            .arg("10")
            .arg("-timeout")
            .arg("10000000")
            .arg("-rw_timeout")
            .arg("10000000")
            .arg("-user_agent")
            .arg(BROWSER_USER_AGENT)
            .arg("-http_persistent")
            .arg("0")
            .arg("-y")
            .arg("-i")
            .arg(url)
            .arg("-c")
            .arg("copy")
            .arg(output);
        command
    }
}

#[async_trait]
impl Downloader for FfmpegDownloader {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn strategy(&self) -> Strategy {
        Strategy::RemuxTool
    }

    async fn download(
        &self,
        url: &str,
        output: &Path,
        _progress: &ItemProgress<'_>,
    ) -> Result<u64, DownloadError> {
        info!("ℹ️  HLS stream, remuxing with ffmpeg: {}", url);
        run_tool(self.name(), self.command(url, output), output, self.timeout).await
    }
}
