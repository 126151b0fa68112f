// Feed HTTP client
//
// Wraps `reqwest::Client` with feed-specific URL handling and body parsing.
// Both feeds are static JSON arrays served without authentication, so the
// transport layer here is deliberately thin: GET, status check, parse.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::types::{MemberSample, MessageSample};

/// Default member feed published by the collector.
pub const DEFAULT_MEMBER_FEED: &str =
    "https://raw.githubusercontent.com/ThatSINEWAVE/Server-Monitor/refs/heads/main/data/member_count.json";

/// Default message feed published by the collector.
pub const DEFAULT_MESSAGE_FEED: &str =
    "https://raw.githubusercontent.com/ThatSINEWAVE/Server-Monitor/refs/heads/main/data/messages.json";

/// Where to fetch the two feeds from, and how patient to be about it.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub member_url: Url,
    pub message_url: Url,
    /// Per-request timeout. The feeds have no retry semantics, so a hung
    /// request would otherwise stall a refresh cycle indefinitely.
    pub timeout: Duration,
}

impl FeedConfig {
    /// Config pointing at the collector's published feeds.
    pub fn new(member_url: &str, message_url: &str, timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            member_url: Url::parse(member_url)?,
            message_url: Url::parse(message_url)?,
            timeout,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            member_url: Url::parse(DEFAULT_MEMBER_FEED).expect("default member URL is valid"),
            message_url: Url::parse(DEFAULT_MESSAGE_FEED).expect("default message URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the member and message feeds.
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: FeedConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// The configured member feed URL.
    pub fn member_url(&self) -> &Url {
        &self.config.member_url
    }

    /// The configured message feed URL.
    pub fn message_url(&self) -> &Url {
        &self.config.message_url
    }

    /// Fetch the member-count history. Order is whatever the feed serves.
    pub async fn fetch_members(&self) -> Result<Vec<MemberSample>, Error> {
        self.fetch_feed(self.config.member_url.clone()).await
    }

    /// Fetch the message-rate history. Order is whatever the feed serves.
    pub async fn fetch_messages(&self) -> Result<Vec<MessageSample>, Error> {
        self.fetch_feed(self.config.message_url.clone()).await
    }

    /// Fetch both feeds concurrently.
    ///
    /// If either request fails — transport, status, or parse — the whole
    /// operation fails and neither result is returned. This is the contract
    /// the dashboard relies on to keep its two series in lockstep.
    pub async fn fetch_all(&self) -> Result<(Vec<MemberSample>, Vec<MessageSample>), Error> {
        let (members, messages) = tokio::join!(self.fetch_members(), self.fetch_messages());
        Ok((members?, messages?))
    }

    /// GET a feed URL and parse the JSON array body.
    async fn fetch_feed<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url.clone()).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            // Truncate on char boundaries; a byte slice could split a
            // multi-byte character and panic.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
