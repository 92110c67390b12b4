use super::FeedItem;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_jwt: String,
    pub did: String,
    pub handle: String,
}

#[derive(Debug, Deserialize)]
struct LikesPage {
    #[serde(default)]
    feed: Vec<FeedItem>,
    cursor: Option<String>,
}

/// Minimal XRPC client for the calls this tool needs.
pub struct BlueskyClient {
    http: reqwest::Client,
    service: Url,
    page_size: usize,
}

impl BlueskyClient {
    pub fn new(http: reqwest::Client, service: &str, page_size: usize) -> Result<Self> {
        let service =
            Url::parse(service).with_context(|| format!("Invalid service URL {}", service))?;
        Ok(Self {
            http,
            service,
            page_size: page_size.clamp(1, 100),
        })
    }

    fn endpoint(&self, method: &str) -> Result<Url> {
        self.service
            .join(&format!("/xrpc/{}", method))
            .with_context(|| format!("Invalid XRPC method {}", method))
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session> {
        let url = self.endpoint("com.atproto.server.createSession")?;

        let response = self
            .http
            .post(url)
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .context("Failed to reach the Bluesky service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Login failed ({}): {}", status, body);
        }

        let session: Session = response
            .json()
            .await
            .context("Failed to parse login response")?;
        info!("Logged in as {}", session.handle);
        Ok(session)
    }

    /// Fetches liked posts newest first, following cursors until the feed
    /// ends or `max_items` posts have been collected.
    pub async fn liked_posts(&self, session: &Session, max_items: usize) -> Result<Vec<FeedItem>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 1;

        loop {
            let mut url = self.endpoint("app.bsky.feed.getActorLikes")?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("actor", &session.did)
                    .append_pair("limit", &self.page_size.to_string());
                if let Some(cursor) = &cursor {
                    query.append_pair("cursor", cursor);
                }
            }

            let response = self
                .http
                .get(url)
                .bearer_auth(&session.access_jwt)
                .send()
                .await
                .context("Failed to fetch liked posts")?
                .error_for_status()
                .context("Liked posts request was rejected")?;

            let likes: LikesPage = response
                .json()
                .await
                .context("Failed to parse liked posts")?;

            debug!("Fetched page {} with {} posts", page, likes.feed.len());
            // An empty page ends the listing even if the server hands back a cursor.
            let exhausted = likes.feed.is_empty();
            items.extend(likes.feed);
            page += 1;

            cursor = likes.cursor.filter(|c| !c.is_empty());
            if exhausted || cursor.is_none() || items.len() >= max_items {
                break;
            }
        }

        items.truncate(max_items);
        info!("Total liked posts fetched: {}", items.len());
        Ok(items)
    }
}
