use std::error::Error as StdError;

/// Crate-wide result type for chat transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared by every [`ChatGateway`](crate::ChatGateway) implementation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The destination could not be mapped onto the transport.
    #[error("unknown chat destination: {destination}")]
    UnknownDestination { destination: String },

    /// Operation is currently unavailable (not connected, stream already taken).
    #[error("chat operation unavailable: {message}")]
    Unavailable { message: String },

    /// Wrapped source error from the transport.
    #[error("chat operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_destination(destination: impl std::fmt::Display) -> Self {
        Self::UnknownDestination {
            destination: destination.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_render_their_context() {
        assert_eq!(
            Error::unknown_destination("@nowhere").to_string(),
            "unknown chat destination: @nowhere"
        );
        assert_eq!(
            Error::unavailable("inbound stream already taken").to_string(),
            "chat operation unavailable: inbound stream already taken"
        );
    }

    #[test]
    fn external_keeps_its_source() {
        let io = std::io::Error::other("connection reset");
        let err = Error::external("telegram send", io);
        assert_eq!(
            err.to_string(),
            "chat operation failed: telegram send: connection reset"
        );
        assert!(StdError::source(&err).is_some());
    }
}
