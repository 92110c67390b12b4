use crate::bluesky::FeedItem;
use serde_json::Value;

const VIDEO_TYPE: &str = "app.bsky.embed.video";
const EXTERNAL_TYPE: &str = "app.bsky.embed.external";
const RECORD_WITH_MEDIA_TYPE: &str = "app.bsky.embed.recordWithMedia";

/// Domains whose links need a platform extractor instead of a plain fetch.
pub const PLATFORM_DOMAINS: [&str; 3] = ["youtube.com", "youtu.be", "vimeo.com"];

/// Embed variants, keyed on `$type` with any `#view`-style suffix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedKind {
    Video {
        playlist: Option<String>,
        video_url: Option<String>,
    },
    External {
        url: Option<String>,
        is_video: bool,
    },
    RecordWithMedia {
        media: Option<Box<EmbedKind>>,
    },
    Other,
}

impl EmbedKind {
    /// Reads an embed from raw JSON. Missing or mistyped fields degrade to
    /// `None`/`Other` so this never fails.
    pub fn from_value(embed: &Value) -> Self {
        let embed_type = embed["$type"].as_str().unwrap_or_default();
        let base_type = embed_type.split('#').next().unwrap_or_default();

        match base_type {
            VIDEO_TYPE => EmbedKind::Video {
                playlist: non_empty(&embed["playlist"]),
                video_url: non_empty(&embed["video"]["url"]),
            },
            EXTERNAL_TYPE => EmbedKind::External {
                url: non_empty(&embed["external"]["url"]),
                is_video: embed["external"]["isVideo"].as_bool().unwrap_or(false),
            },
            RECORD_WITH_MEDIA_TYPE => EmbedKind::RecordWithMedia {
                media: embed
                    .get("media")
                    .filter(|media| media.is_object())
                    .map(|media| Box::new(EmbedKind::from_value(media))),
            },
            _ => EmbedKind::Other,
        }
    }
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn is_platform_url(url: &str) -> bool {
    PLATFORM_DOMAINS.iter().any(|domain| url.contains(domain))
}

/// Where the media lives inside the embed that was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Direct {
        playlist: Option<String>,
        video_url: Option<String>,
    },
    External {
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    DirectVideo,
    ExternalLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub post_id: String,
    pub source: VideoSource,
}

impl VideoRef {
    pub fn kind(&self) -> VideoKind {
        match self.source {
            VideoSource::Direct { .. } => VideoKind::DirectVideo,
            VideoSource::External { .. } => VideoKind::ExternalLink,
        }
    }
}

/// Returns a video reference when the liked post carries a video.
pub fn classify(item: &FeedItem) -> Option<VideoRef> {
    let embed = item.post.embed.as_ref()?;

    let source = match EmbedKind::from_value(embed) {
        EmbedKind::RecordWithMedia { media } => media_source(&*media?),
        kind => media_source(&kind),
    }?;

    Some(VideoRef {
        post_id: item.post_id().to_string(),
        source,
    })
}

// Only one level of nesting is inspected: media inside media is ignored.
fn media_source(kind: &EmbedKind) -> Option<VideoSource> {
    match kind {
        EmbedKind::Video {
            playlist,
            video_url,
        } => Some(VideoSource::Direct {
            playlist: playlist.clone(),
            video_url: video_url.clone(),
        }),
        EmbedKind::External { url, is_video } => {
            let looks_like_video = url
                .as_deref()
                .is_some_and(|url| is_platform_url(url) || url.ends_with(".mp4"));

            if *is_video || looks_like_video {
                Some(VideoSource::External { url: url.clone() })
            } else {
                None
            }
        }
        EmbedKind::RecordWithMedia { .. } | EmbedKind::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(embed: Value) -> FeedItem {
        FeedItem::from_parts("at://did:plc:abc/app.bsky.feed.post/3kxyz", Some(embed))
    }

    #[test]
    fn test_unknown_types_are_not_videos() {
        for embed_type in [
            "app.bsky.embed.images#view",
            "app.bsky.embed.record",
            "",
            "something.else",
        ] {
            assert_eq!(classify(&item(json!({ "$type": embed_type }))), None);
        }
    }

    #[test]
    fn test_missing_or_malformed_embed() {
        let no_embed = FeedItem::from_parts("at://did:plc:abc/app.bsky.feed.post/1", None);
        assert_eq!(classify(&no_embed), None);
        assert_eq!(classify(&item(json!("not an object"))), None);
        assert_eq!(classify(&item(json!({ "$type": 42 }))), None);
        assert_eq!(
            classify(&item(json!({ "$type": "app.bsky.embed.external", "external": null }))),
            None
        );
    }

    #[test]
    fn test_video_embed_is_always_video() {
        let video = classify(&item(json!({
            "$type": "app.bsky.embed.video#view",
            "playlist": "https://video.bsky.app/watch/x/playlist.m3u8"
        })))
        .unwrap();

        assert_eq!(video.post_id, "3kxyz");
        assert_eq!(video.kind(), VideoKind::DirectVideo);

        let bare = classify(&item(json!({ "$type": "app.bsky.embed.video" }))).unwrap();
        assert_eq!(
            bare.source,
            VideoSource::Direct {
                playlist: None,
                video_url: None
            }
        );
    }

    #[test]
    fn test_external_mp4_without_flag() {
        let video = classify(&item(json!({
            "$type": "app.bsky.embed.external#view",
            "external": { "uri": "x", "url": "https://cdn.example.com/clip.mp4" }
        })))
        .unwrap();

        assert_eq!(video.kind(), VideoKind::ExternalLink);
    }

    #[test]
    fn test_external_platform_links_and_flag() {
        for url in [
            "https://www.youtube.com/watch?v=abc",
            "https://youtu.be/abc",
            "https://vimeo.com/123",
        ] {
            let embed = json!({ "$type": "app.bsky.embed.external", "external": { "url": url } });
            assert!(classify(&item(embed)).is_some(), "{url} should be a video");
        }

        let flagged = json!({
            "$type": "app.bsky.embed.external",
            "external": { "url": "https://example.com/watch", "isVideo": true }
        });
        assert!(classify(&item(flagged)).is_some());

        let article = json!({
            "$type": "app.bsky.embed.external",
            "external": { "url": "https://example.com/article.html" }
        });
        assert_eq!(classify(&item(article)), None);
    }

    #[test]
    fn test_record_with_media_video() {
        let video = classify(&item(json!({
            "$type": "app.bsky.embed.recordWithMedia#view",
            "record": { "uri": "at://someone/else" },
            "external": { "url": "https://example.com/ignored" },
            "media": {
                "$type": "app.bsky.embed.video#view",
                "playlist": "https://video.bsky.app/p.m3u8"
            }
        })))
        .unwrap();

        assert_eq!(
            video.source,
            VideoSource::Direct {
                playlist: Some("https://video.bsky.app/p.m3u8".to_string()),
                video_url: None
            }
        );
    }

    #[test]
    fn test_record_with_media_external_link() {
        let video = classify(&item(json!({
            "$type": "app.bsky.embed.recordWithMedia#view",
            "record": { "record": { "uri": "at://did:plc:other/app.bsky.feed.post/1" } },
            "media": {
                "$type": "app.bsky.embed.external#view",
                "external": { "url": "https://youtu.be/abc" }
            }
        })))
        .unwrap();

        assert_eq!(video.post_id, "3kxyz");
        assert_eq!(video.kind(), VideoKind::ExternalLink);
        assert_eq!(
            video.source,
            VideoSource::External {
                url: Some("https://youtu.be/abc".to_string())
            }
        );
    }

    #[test]
    fn test_record_with_media_without_video() {
        let no_media = json!({ "$type": "app.bsky.embed.recordWithMedia" });
        assert_eq!(classify(&item(no_media)), None);

        let images = json!({
            "$type": "app.bsky.embed.recordWithMedia",
            "media": { "$type": "app.bsky.embed.images#view" }
        });
        assert_eq!(classify(&item(images)), None);

        let nested = json!({
            "$type": "app.bsky.embed.recordWithMedia",
            "media": {
                "$type": "app.bsky.embed.recordWithMedia",
                "media": { "$type": "app.bsky.embed.video" }
            }
        });
        assert_eq!(classify(&item(nested)), None);
    }
}
