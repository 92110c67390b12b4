use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod app;
mod bluesky;
mod config;
mod media;
mod utils;

const APP_DIR: &str = "bsky-video-downloader";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory videos are saved to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Bluesky handle or email to log in with
    #[arg(short, long)]
    identifier: Option<String>,

    /// Maximum number of liked posts to scan
    #[arg(long)]
    max_items: Option<usize>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("BSKY_VIDEO_DOWNLOADER_CONFIG") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/{}/config.toml", xdg_config_home, APP_DIR);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/{}/config.toml", home.display(), APP_DIR);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn load_config(args: &Args) -> Result<config::Config> {
    let mut config = match get_config_path(args) {
        Some(path) => config::Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => config::Config::default(),
    };

    if let Some(output_dir) = &args.output_dir {
        config.download.output_dir = output_dir.clone();
    }
    if let Some(identifier) = &args.identifier {
        config.bluesky.identifier = Some(identifier.clone());
    }
    if let Some(max_items) = args.max_items {
        config.bluesky.max_items = max_items;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match get_config_path(&args) {
        Some(path) => info!("Loaded config from: {}", path),
        None => info!("No config file found, using defaults"),
    }

    app::run(config, args.yes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[bluesky]\nidentifier = \"file.bsky.social\"\nmax_items = 200\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "bsky-video-downloader",
            "--config",
            path.to_str().unwrap(),
            "--output-dir",
            "/tmp/liked",
            "--max-items",
            "10",
            "--yes",
        ]);
        let config = load_config(&args).unwrap();

        assert!(args.yes);
        assert_eq!(config.bluesky.identifier.as_deref(), Some("file.bsky.social"));
        assert_eq!(config.bluesky.max_items, 10);
        assert_eq!(config.download.output_dir, PathBuf::from("/tmp/liked"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["bsky-video-downloader", "-c", "/nonexistent/config.toml"]);
        assert!(load_config(&args).is_err());
    }
}
