use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use {
    secrecy::Secret,
    serde::Deserialize,
    ytbot_channels::ChatDestination,
};

use crate::{Result, parse_duration};

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Chats that receive new-video notifications, in delivery order.
    pub chats: Vec<ChatDestination>,

    /// Telegram bot token from @BotFather.
    #[serde(alias = "apitoken")]
    pub api_token: Secret<String>,

    pub youtube: YoutubeConfig,

    pub telegram: TelegramConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            chats: Vec::new(),
            api_token: Secret::new(String::new()),
            youtube: YoutubeConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

/// Tracked channels and polling cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Channel IDs to watch, in notification order.
    pub channels: Vec<String>,

    /// Pause between poll cycles (e.g. "5m").
    pub cooldown: String,

    /// JSON file holding `{"api_key": ...}` or a cached OAuth token with an
    /// `access_token` field. An OAuth client secret (`installed`/`web`) is
    /// rejected. Relative paths resolve against the working directory.
    #[serde(alias = "ytsecret")]
    pub credentials_path: PathBuf,

    /// Upper bound for any single API or chat call (e.g. "30s").
    pub request_timeout: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            cooldown: "5m".into(),
            credentials_path: PathBuf::from("credentials.json"),
            request_timeout: "30s".into(),
        }
    }
}

impl YoutubeConfig {
    pub fn cooldown(&self) -> Result<Duration> {
        parse_duration(&self.cooldown)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.request_timeout)
    }

    /// Credentials path, resolved against `base_dir` when relative.
    #[must_use]
    pub fn resolved_credentials_path(&self, base_dir: &Path) -> PathBuf {
        if self.credentials_path.is_absolute() {
            self.credentials_path.clone()
        } else {
            base_dir.join(&self.credentials_path)
        }
    }
}

/// Telegram long-polling knobs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelegramConfig {
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u32,
    /// Pause after a failed `getUpdates` call, in seconds.
    pub retry_backoff_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            retry_backoff_secs: 5,
        }
    }
}
