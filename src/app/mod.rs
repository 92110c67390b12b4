mod prompt;

use crate::bluesky::BlueskyClient;
use crate::config::Config;
use crate::media::{self, DownloadOrchestrator, LogProgress, RunReport, ToolAvailability};
use anyhow::{Context, Result};
use prompt::Prompter;
use std::time::Duration;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub async fn run(config: Config, assume_yes: bool) -> Result<()> {
    let mut prompter = Prompter::stdin(assume_yes);

    println!("\n==============================================");
    println!("🌟 BLUESKY VIDEO DOWNLOADER 🌟");
    println!("==============================================\n");

    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let client = BlueskyClient::new(
        http.clone(),
        &config.bluesky.service,
        config.bluesky.page_size,
    )?;

    let identifier = match &config.bluesky.identifier {
        Some(identifier) => identifier.clone(),
        None => prompter.ask("👤 Email or username: ").await?,
    };
    let password = match std::env::var("BLUESKY_PASSWORD") {
        Ok(password) => password,
        Err(_) => prompter.ask("   Password: ").await?,
    };

    let session = client
        .login(&identifier, &password)
        .await
        .context("Login failed")?;
    println!("\n✅ Logged in successfully!");

    println!("\n🔍 Fetching your liked posts...");
    let liked = client
        .liked_posts(&session, config.bluesky.max_items)
        .await?;

    let videos: Vec<_> = liked.iter().filter_map(media::classify).collect();
    info!(
        "Found {} posts with videos out of {} liked posts",
        videos.len(),
        liked.len()
    );

    if videos.is_empty() {
        println!("\n❌ No videos found in your liked posts.");
        return Ok(());
    }

    let question = format!(
        "\n📥 Found {} videos. Do you want to download them now?",
        videos.len()
    );
    if !prompter.confirm(&question).await? {
        println!("\n✅ Download canceled. Goodbye!");
        return Ok(());
    }

    let tools = ToolAvailability::probe(&config.tools).await;
    if !confirm_tools(&tools, &mut prompter).await? {
        println!("\n✅ Download canceled. Goodbye!");
        return Ok(());
    }

    let output_dir = &config.download.output_dir;
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let downloaders = media::default_downloaders(&config.tools, http);
    let orchestrator =
        DownloadOrchestrator::new(output_dir, tools, downloaders).with_progress(LogProgress::new());

    println!("\n📥 Starting video downloads...");
    let report = orchestrator.run(&videos).await?;

    print_summary(&report, &orchestrator);
    Ok(())
}

/// Whether to go on with the tools at hand. Only asks when neither tool exists.
async fn confirm_tools<R: AsyncBufRead + Unpin>(
    tools: &ToolAvailability,
    prompter: &mut Prompter<R>,
) -> Result<bool> {
    if !tools.none_available() {
        return Ok(true);
    }

    warn!("Neither ffmpeg nor yt-dlp is installed");
    println!("\n⚠️  Warning: Neither ffmpeg nor yt-dlp is installed.");
    println!("   HLS streams and YouTube/Vimeo links cannot be downloaded.");
    prompter
        .confirm("\n   Do you want to continue anyway?")
        .await
}

fn print_summary(report: &RunReport, orchestrator: &DownloadOrchestrator) {
    let output_dir = std::path::absolute(orchestrator.output_dir())
        .unwrap_or_else(|_| orchestrator.output_dir().to_path_buf());

    println!("\n==============================================");
    println!("📊 DOWNLOAD SUMMARY");
    println!("==============================================");
    println!("🎬 Videos processed: {}", report.summary.total());
    println!("✅ Successfully downloaded: {}", report.summary.downloaded);
    println!("⏩ Skipped (already downloaded): {}", report.summary.skipped);
    println!("❌ Failed to download: {}", report.summary.failed);
    println!("📁 Videos saved to: {}", output_dir.display());
    println!("==============================================\n");

    if report.summary.failed > 0 {
        for outcome in report.outcomes.iter().filter(|o| o.error.is_some()) {
            println!(
                "   {}: {}",
                outcome.post_id,
                outcome.error_message().unwrap_or_default()
            );
        }
        println!("\n⚠️  Some videos failed to download. You might want to:");
        println!("   1. Make sure ffmpeg and yt-dlp are installed");
        println!("   2. Run the program again to retry failed downloads");
        println!("   3. Check your internet connection\n");
    }
}
