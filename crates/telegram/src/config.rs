use secrecy::Secret;

/// Connection settings for the Telegram bot.
#[derive(Clone)]
pub struct TelegramAccountConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,

    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u32,

    /// Pause after a failed `getUpdates` call, in seconds.
    pub retry_backoff_secs: u64,
}

impl TelegramAccountConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for TelegramAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAccountConfig")
            .field("token", &"[REDACTED]")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_backoff_secs", &self.retry_backoff_secs)
            .finish()
    }
}

impl Default for TelegramAccountConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            poll_timeout_secs: 30,
            retry_backoff_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn default_config() {
        let cfg = TelegramAccountConfig::default();
        assert_eq!(cfg.poll_timeout_secs, 30);
        assert_eq!(cfg.retry_backoff_secs, 5);
    }

    #[test]
    fn new_keeps_token_and_defaults() {
        let cfg = TelegramAccountConfig::new("123:ABC");
        assert_eq!(cfg.token.expose_secret(), "123:ABC");
        assert_eq!(cfg.poll_timeout_secs, 30);
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = TelegramAccountConfig::new("123:SECRET");
        assert!(!format!("{cfg:?}").contains("123:SECRET"));
    }
}
