use super::{error::DownloadError, progress::ItemProgress, strategy::Strategy};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[async_trait]
pub trait Downloader: Send + Sync {
    /// Human-readable name of the downloader
    fn name(&self) -> &'static str;

    /// The strategy this downloader carries out
    fn strategy(&self) -> Strategy;

    /// Download `url` into `output`, returning the number of bytes written.
    ///
    /// On error no complete-looking file may be left at `output`.
    async fn download(
        &self,
        url: &str,
        output: &Path,
        progress: &ItemProgress<'_>,
    ) -> Result<u64, DownloadError>;
}

/// Runs an external tool that writes `output` itself and checks the result.
pub(super) async fn run_tool(
    tool: &'static str,
    mut command: Command,
    output: &Path,
    timeout: Duration,
) -> Result<u64, DownloadError> {
    debug!("Running {}: {:?}", tool, command.as_std());

    let result = tokio::time::timeout(
        timeout,
        command
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| DownloadError::Timeout {
        tool,
        secs: timeout.as_secs(),
    })?
    .map_err(|source| DownloadError::ToolNotFound { tool, source })?;

    if !result.status.success() {
        return Err(DownloadError::ProcessFailed {
            tool,
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    match tokio::fs::metadata(output).await {
        Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
        _ => Err(DownloadError::MissingOutput {
            tool,
            path: output.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let err = run_tool(
            "missing",
            Command::new("definitely-not-a-tool-4f9a"),
            &output,
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DownloadError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_success_requires_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let err = run_tool("true", Command::new("true"), &output, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::MissingOutput { .. }));

        let mut command = Command::new("sh");
        command.arg("-c").arg(format!("printf abc > '{}'", output.display()));
        let bytes = run_tool("sh", command, &output, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(bytes, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_failure_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let mut command = Command::new("sh");
        command.arg("-c").arg("echo 'HTTP error 403' >&2; exit 3");
        let err = run_tool("sh", command, &output, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            DownloadError::ProcessFailed { stderr, status, .. } => {
                assert_eq!(stderr, "HTTP error 403");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let mut command = Command::new("sleep");
        command.arg("5");
        let err = run_tool("sleep", command, &output, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Timeout { tool: "sleep", .. }));
    }
}
