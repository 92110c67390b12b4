use super::{
    downloader::Downloader, error::DownloadError, progress::ItemProgress, strategy::Strategy,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Streams the response body of a plain GET straight to disk.
pub struct DirectDownloader {
    client: reqwest::Client,
}

impl DirectDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn stream_to(
        &self,
        url: &str,
        partial: &Path,
        progress: &ItemProgress<'_>,
    ) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let total = response.content_length();
        debug!("Content length for {}: {:?}", url, total);

        let mut file = tokio::fs::File::create(partial)
            .await
            .map_err(|e| DownloadError::filesystem(partial, e))?;

        let mut received = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let data = chunk?;
            file.write_all(&data)
                .await
                .map_err(|e| DownloadError::filesystem(partial, e))?;
            received += data.len() as u64;
            progress.bytes_received(received, total);
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::filesystem(partial, e))?;

        Ok(received)
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[async_trait]
impl Downloader for DirectDownloader {
    fn name(&self) -> &'static str {
        "http"
    }

    fn strategy(&self) -> Strategy {
        Strategy::DirectStream
    }

    async fn download(
        &self,
        url: &str,
        output: &Path,
        progress: &ItemProgress<'_>,
    ) -> Result<u64, DownloadError> {
        info!("🔄 Downloading direct video: {}", url);

        // Written under a `.part` name so an interrupted transfer never looks
        // like a finished download.
        let partial = partial_path(output);
        match self.stream_to(url, &partial, progress).await {
            Ok(bytes) => match tokio::fs::rename(&partial, output).await {
                Ok(()) => Ok(bytes),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&partial).await;
                    Err(DownloadError::filesystem(output, e))
                }
            },
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }
}
