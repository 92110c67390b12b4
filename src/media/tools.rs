use crate::config::ToolsConfig;
use tokio::process::Command;
use tracing::{info, warn};

/// Which external tools this host can run. Probed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolAvailability {
    pub has_remux_tool: bool,
    pub has_extraction_tool: bool,
}

impl ToolAvailability {
    pub async fn probe(tools: &ToolsConfig) -> Self {
        let has_remux_tool = test_availability(&tools.ffmpeg, "-version").await;
        let has_extraction_tool = test_availability(&tools.yt_dlp, "--version").await;

        if has_extraction_tool && !has_remux_tool {
            warn!("⚠️  yt-dlp will work but HLS streams can only be fetched through it");
        }

        Self {
            has_remux_tool,
            has_extraction_tool,
        }
    }

    pub fn none_available(&self) -> bool {
        !self.has_remux_tool && !self.has_extraction_tool
    }
}

/// Runs `program flag` and reports whether it exited cleanly.
async fn test_availability(program: &str, version_flag: &str) -> bool {
    match Command::new(program)
        .arg(version_flag)
        .stdin(std::process::Stdio::null())
        .output()
        .await
    {
        Ok(output) => {
            if output.status.success() {
                let version_line = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .unwrap_or("unknown")
                    .to_string();
                info!("✅ {} is available: {}", program, version_line.trim());
                true
            } else {
                warn!("❌ {} {} failed with {}", program, version_flag, output.status);
                false
            }
        }
        Err(e) => {
            warn!("❌ {} not found: {}", program, e);
            false
        }
    }
}
