//! Per-channel state and new-video detection.

use std::{sync::Arc, time::Duration};

use {
    tracing::{debug, info, warn},
    ytbot_youtube::VideoPlatform,
};

use crate::{Error, Result, timeout::with_timeout};

const WATCH_URL_PREFIX: &str = "https://youtube.com/watch?v=";

/// What is known about one tracked channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    pub channel_id: String,
    /// Fetched once at startup and never refreshed.
    pub display_name: String,
    /// Newest video confirmed so far; `None` until the channel has one.
    pub last_video_id: Option<String>,
    /// Video count seen by the latest successful poll.
    pub last_video_count: u64,
    /// The count rose last poll but the newest video had not changed yet;
    /// the next poll looks it up again even if the count stays flat.
    pub pending_recheck: bool,
}

/// A newly published video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub channel_id: String,
    pub display_name: String,
    pub video_id: String,
}

impl NotificationEvent {
    #[must_use]
    pub fn video_url(&self) -> String {
        format!("{WATCH_URL_PREFIX}{}", self.video_id)
    }
}

/// A channel that could not be checked during a poll.
#[derive(Debug)]
pub struct PollFailure {
    pub channel_id: String,
    pub error: Error,
}

/// Result of one pass over every tracked channel.
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// New videos, in channel configuration order.
    pub events: Vec<NotificationEvent>,
    pub failures: Vec<PollFailure>,
}

/// Owns the state table of every tracked channel.
///
/// Detection is count-first: the (more expensive) newest-video lookup only
/// runs for channels whose video count went up. When the count rose but the
/// newest video ID did not change yet, nothing is emitted for that poll and
/// the following poll repeats the lookup once, so a lagging ID costs at most
/// one cooldown of latency. The count advances on every successful poll.
pub struct ChannelTracker {
    platform: Arc<dyn VideoPlatform>,
    channels: Vec<ChannelState>,
    request_timeout: Duration,
}

impl ChannelTracker {
    /// Fetch the starting state of every channel, in order.
    ///
    /// Fails on the first channel that cannot be fetched; no partially
    /// initialized tracker is ever returned.
    pub async fn initialize(
        platform: Arc<dyn VideoPlatform>,
        channel_ids: &[String],
        request_timeout: Duration,
    ) -> Result<Self> {
        let mut channels = Vec::with_capacity(channel_ids.len());
        for channel_id in channel_ids {
            let state = fetch_initial_state(platform.as_ref(), channel_id, request_timeout)
                .await
                .map_err(|e| Error::initialization(channel_id.as_str(), e))?;
            info!(
                channel_id = %state.channel_id,
                display_name = %state.display_name,
                video_count = state.last_video_count,
                last_video_id = ?state.last_video_id,
                "tracking channel"
            );
            channels.push(state);
        }

        Ok(Self {
            platform,
            channels,
            request_timeout,
        })
    }

    /// Check every channel once.
    ///
    /// A failing channel is reported in [`PollOutcome::failures`] with its
    /// state left as it was; the remaining channels are still checked.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome::default();

        for state in &mut self.channels {
            match check_channel(self.platform.as_ref(), state, self.request_timeout).await {
                Ok(Some(event)) => {
                    info!(
                        channel_id = %event.channel_id,
                        video_id = %event.video_id,
                        "new video detected"
                    );
                    outcome.events.push(event);
                },
                Ok(None) => {},
                Err(error) => {
                    warn!(
                        channel_id = %state.channel_id,
                        error = %error,
                        "channel poll failed, keeping previous state"
                    );
                    outcome.failures.push(PollFailure {
                        channel_id: state.channel_id.clone(),
                        error,
                    });
                },
            }
        }

        outcome
    }

    /// Read-only view of the state table.
    #[must_use]
    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }
}

async fn fetch_initial_state(
    platform: &dyn VideoPlatform,
    channel_id: &str,
    limit: Duration,
) -> Result<ChannelState> {
    let summary = with_timeout(
        "fetch channel summary",
        limit,
        platform.fetch_channel_summary(channel_id),
    )
    .await?;
    let newest = with_timeout(
        "fetch newest video",
        limit,
        platform.fetch_newest_video_id(channel_id),
    )
    .await?;

    Ok(ChannelState {
        channel_id: channel_id.to_string(),
        display_name: summary.display_name,
        last_video_id: newest,
        last_video_count: summary.video_count,
        pending_recheck: false,
    })
}

/// Update `state` from the platform. Nothing is written unless every fetch
/// this channel needs succeeded.
async fn check_channel(
    platform: &dyn VideoPlatform,
    state: &mut ChannelState,
    limit: Duration,
) -> Result<Option<NotificationEvent>> {
    let summary = with_timeout(
        "fetch channel summary",
        limit,
        platform.fetch_channel_summary(&state.channel_id),
    )
    .await?;
    let count = summary.video_count;

    let rose = count > state.last_video_count;
    if count < state.last_video_count {
        debug!(
            channel_id = %state.channel_id,
            previous_count = state.last_video_count,
            count,
            "video count dropped"
        );
    }

    let mut event = None;
    if rose || state.pending_recheck {
        let newest = with_timeout(
            "fetch newest video",
            limit,
            platform.fetch_newest_video_id(&state.channel_id),
        )
        .await?;

        match newest {
            Some(video_id) if state.last_video_id.as_deref() != Some(video_id.as_str()) => {
                state.last_video_id = Some(video_id.clone());
                state.pending_recheck = false;
                event = Some(NotificationEvent {
                    channel_id: state.channel_id.clone(),
                    display_name: state.display_name.clone(),
                    video_id,
                });
            },
            _ if rose => {
                debug!(
                    channel_id = %state.channel_id,
                    previous_count = state.last_video_count,
                    count,
                    "video count rose but newest video is unchanged, rechecking next poll"
                );
                state.pending_recheck = true;
            },
            _ => {
                debug!(
                    channel_id = %state.channel_id,
                    "newest video still unchanged after recheck, giving up"
                );
                state.pending_recheck = false;
            },
        }
    }

    state.last_video_count = count;
    Ok(event)
}
