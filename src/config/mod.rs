use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
pub const DEFAULT_MAX_ITEMS: usize = 500;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BlueskyConfig {
    pub service: String,
    pub identifier: Option<String>,
    pub max_items: usize,
    pub page_size: usize,
}

impl Default for BlueskyConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            identifier: None,
            max_items: DEFAULT_MAX_ITEMS,
            page_size: 100,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
        }
    }
}

/// Names (or paths) of the external tools and how long one invocation may run.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub yt_dlp: String,
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            yt_dlp: "yt-dlp".to_string(),
            timeout_secs: 1800,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub bluesky: BlueskyConfig,
    pub download: DownloadConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }
}
