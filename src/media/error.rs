use super::{resolver::Transport, strategy::Strategy};
use std::path::PathBuf;
use std::process::ExitStatus;

/// Failure of a single strategy attempt. None of these end the run.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("{0} is not available")]
    ToolUnavailable(Strategy),

    #[error("failed to start {tool}: {source}")]
    ToolNotFound {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ProcessFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("{tool} reported success but wrote no file at {}", .path.display())]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Why an item ended up `Failed`.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("no video URL found")]
    UrlNotFound,

    #[error("no installed tool can download {0} URLs (install ffmpeg and/or yt-dlp)")]
    NoStrategy(Transport),

    #[error(transparent)]
    Download(#[from] DownloadError),
}
