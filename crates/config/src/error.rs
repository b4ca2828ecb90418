use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("no config file ({}) found in {}", crate::CONFIG_FILENAMES.join(", "), .dir.display())]
    NotFound { dir: PathBuf },

    #[error("invalid duration {input:?}: {message}")]
    InvalidDuration { input: String, message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_duration(input: &str, message: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.to_string(),
            message: message.into(),
        }
    }
}
