use async_trait::async_trait;

use crate::Result;

/// Metadata of a channel at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub display_name: String,
    pub video_count: u64,
}

/// Read-only queries against the video platform.
///
/// Every call is independent; implementations hold no per-call state so a
/// single handle can be shared across tasks.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Find the ID of the channel best matching a free-text `name`.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the
    /// search has no result.
    async fn resolve_channel_id(&self, name: &str) -> Result<String>;

    /// Fetch the display name and total video count of a channel.
    async fn fetch_channel_summary(&self, channel_id: &str) -> Result<ChannelSummary>;

    /// Fetch the ID of the most recently published video, or `None` when
    /// the channel has no videos.
    async fn fetch_newest_video_id(&self, channel_id: &str) -> Result<Option<String>>;
}
