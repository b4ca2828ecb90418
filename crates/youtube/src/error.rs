use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered but returned no matching item.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Non-success HTTP status.
    #[error("youtube API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("invalid credentials file {path}: {message}")]
    Credentials { path: String, message: String },

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl Error {
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    #[must_use]
    pub fn decode(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
