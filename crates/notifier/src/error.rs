use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Initial state for a channel could not be fetched. Fatal at startup.
    #[error("failed to initialize channel {channel_id}: {source}")]
    Initialization {
        channel_id: String,
        #[source]
        source: Box<Error>,
    },

    /// A gateway call did not finish within the configured limit.
    #[error("{operation} timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error(transparent)]
    Youtube(#[from] ytbot_youtube::Error),

    #[error(transparent)]
    Channel(#[from] ytbot_channels::Error),
}

impl Error {
    #[must_use]
    pub fn initialization(channel_id: impl Into<String>, source: Error) -> Self {
        Self::Initialization {
            channel_id: channel_id.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        Self::Timeout { operation, timeout }
    }

    /// Whether the platform reported that the requested item does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Youtube(e) if e.is_not_found())
    }
}
