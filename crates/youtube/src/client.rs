use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::Client,
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    ChannelSummary, Credentials, Error, Result, VideoPlatform,
    types::{ChannelItem, ListResponse, SearchItem},
};

/// Production endpoint of the YouTube Data API v3.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Data API v3 client.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl YoutubeClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_timeout(credentials, DEFAULT_TIMEOUT)
    }

    /// Build a client whose HTTP requests give up after `timeout`.
    pub fn with_timeout(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            credentials,
        })
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(self)
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.endpoint(resource);
        debug!(url = %url, ?query, "youtube API request");

        let request = self.credentials.apply(self.http.get(&url).query(query));
        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(resource, status, "youtube API request failed");
            return Err(Error::Http { status, body });
        }

        let body = resp.bytes().await?;
        let list: ListResponse<T> = serde_json::from_slice(&body)
            .map_err(|source| Error::decode(format!("{resource} response"), source))?;
        Ok(list.items)
    }
}

#[async_trait]
impl VideoPlatform for YoutubeClient {
    async fn resolve_channel_id(&self, name: &str) -> Result<String> {
        let items: Vec<SearchItem> = self
            .get_list("search", &[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "1"),
                ("q", name),
            ])
            .await?;

        items
            .into_iter()
            .find_map(|item| item.id.channel_id)
            .ok_or_else(|| Error::not_found(format!("channel matching \"{name}\"")))
    }

    async fn fetch_channel_summary(&self, channel_id: &str) -> Result<ChannelSummary> {
        let items: Vec<ChannelItem> = self
            .get_list("channels", &[
                ("part", "snippet,statistics"),
                ("id", channel_id),
            ])
            .await?;

        let item = items
            .into_iter()
            .find(|item| item.id == channel_id)
            .ok_or_else(|| Error::not_found(format!("channel {channel_id}")))?;

        let display_name = item
            .snippet
            .map(|s| s.title)
            .ok_or_else(|| Error::not_found(format!("snippet of channel {channel_id}")))?;

        let raw_count = item
            .statistics
            .and_then(|s| s.video_count)
            .ok_or_else(|| Error::not_found(format!("video count of channel {channel_id}")))?;
        let video_count = raw_count
            .parse::<u64>()
            .map_err(|source| Error::decode(format!("video count {raw_count:?}"), source))?;

        Ok(ChannelSummary {
            display_name,
            video_count,
        })
    }

    async fn fetch_newest_video_id(&self, channel_id: &str) -> Result<Option<String>> {
        let items: Vec<SearchItem> = self
            .get_list("search", &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("maxResults", "1"),
                ("order", "date"),
                ("type", "video"),
            ])
            .await?;

        Ok(items.into_iter().find_map(|item| item.id.video_id))
    }
}
