mod client;

pub use client::BlueskyClient;

use crate::utils::post_id_from_uri;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct PostView {
    pub uri: String,
    /// Kept as raw JSON; its shape varies with `$type`.
    #[serde(default)]
    pub embed: Option<Value>,
}

/// One entry of the liked-posts feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedItem {
    pub post: PostView,
}

impl FeedItem {
    #[cfg(test)]
    pub fn from_parts(uri: &str, embed: Option<Value>) -> Self {
        Self {
            post: PostView {
                uri: uri.to_string(),
                embed,
            },
        }
    }

    pub fn post_id(&self) -> &str {
        post_id_from_uri(&self.post.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_feed_item() {
        let item: FeedItem = serde_json::from_value(json!({
            "post": {
                "uri": "at://did:plc:abc/app.bsky.feed.post/3kxyz",
                "cid": "bafy",
                "author": { "did": "did:plc:abc", "handle": "alice.bsky.social" },
                "embed": { "$type": "app.bsky.embed.video#view", "playlist": "p.m3u8" }
            },
            "reason": null
        }))
        .unwrap();

        assert_eq!(item.post_id(), "3kxyz");
        assert_eq!(item.post.embed.unwrap()["playlist"], "p.m3u8");
    }

    #[test]
    fn test_post_without_embed() {
        let item: FeedItem =
            serde_json::from_value(json!({ "post": { "uri": "at://x/app.bsky.feed.post/1" } }))
                .unwrap();
        assert!(item.post.embed.is_none());
    }
}
