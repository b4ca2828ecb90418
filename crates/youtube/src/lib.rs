//! YouTube Data API access for the bot.
//!
//! [`VideoPlatform`] is the narrow contract the notifier depends on;
//! [`YoutubeClient`] implements it over the YouTube Data API v3.

pub mod client;
pub mod credentials;
pub mod error;
pub mod platform;
mod types;

pub use {
    client::{DEFAULT_BASE_URL, YoutubeClient},
    credentials::Credentials,
    error::{Error, Result},
    platform::{ChannelSummary, VideoPlatform},
};
