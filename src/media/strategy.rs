use super::{resolver::ResolvedUrl, resolver::Transport, tools::ToolAvailability};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// ffmpeg stream copy
    RemuxTool,
    /// yt-dlp
    ExtractionTool,
    /// plain HTTP GET
    DirectStream,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::RemuxTool => "ffmpeg",
            Strategy::ExtractionTool => "yt-dlp",
            Strategy::DirectStream => "direct download",
        };
        write!(f, "{}", s)
    }
}

/// Orders the strategies worth trying for a URL. An empty list means no
/// installed tool can handle it.
pub fn select(resolved: &ResolvedUrl, tools: &ToolAvailability) -> Vec<Strategy> {
    match resolved.transport {
        Transport::PlatformLink => tools
            .has_extraction_tool
            .then_some(Strategy::ExtractionTool)
            .into_iter()
            .collect(),
        Transport::HlsStream => [
            (Strategy::RemuxTool, tools.has_remux_tool),
            (Strategy::ExtractionTool, tools.has_extraction_tool),
        ]
        .into_iter()
        .filter(|(_, available)| *available)
        .map(|(strategy, _)| strategy)
        .collect(),
        Transport::DirectFile => vec![Strategy::DirectStream],
    }
}
