use super::embed::{is_platform_url, VideoRef, VideoSource};
use std::fmt;

/// How a resolved URL has to be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    DirectFile,
    HlsStream,
    PlatformLink,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transport::DirectFile => "direct-file",
            Transport::HlsStream => "hls-stream",
            Transport::PlatformLink => "platform-link",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub transport: Transport,
}

/// Picks the URL to fetch for a video and how to fetch it.
///
/// Precedence: explicit playlist field, then `.m3u8`/`playlist` in the URL,
/// then a known platform domain, then a plain direct download.
pub fn resolve(video: &VideoRef) -> Option<ResolvedUrl> {
    match &video.source {
        VideoSource::Direct {
            playlist: Some(playlist),
            ..
        } => Some(ResolvedUrl {
            url: playlist.clone(),
            transport: Transport::HlsStream,
        }),
        VideoSource::Direct {
            video_url: Some(url),
            ..
        }
        | VideoSource::External { url: Some(url) } => Some(ResolvedUrl {
            url: url.clone(),
            transport: transport_for(url),
        }),
        _ => None,
    }
}

// "playlist" anywhere in the URL counts as HLS, even in a plain file path.
pub fn transport_for(url: &str) -> Transport {
    if url.contains(".m3u8") || url.contains("playlist") {
        Transport::HlsStream
    } else if is_platform_url(url) {
        Transport::PlatformLink
    } else {
        Transport::DirectFile
    }
}
