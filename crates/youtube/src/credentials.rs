use std::path::Path;

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{Error, Result};

/// How requests to the API are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// Public-data API key, sent as the `key` query parameter.
    ApiKey(Secret<String>),
    /// OAuth access token, sent as a bearer token.
    AccessToken(Secret<String>),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Self::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
        }
    }
}

/// On-disk shape: either `{"api_key": ...}` or a cached OAuth token with
/// an `access_token` field. Extra fields (`refresh_token`, `expiry`, ...)
/// are ignored.
///
/// `installed` and `web` are the top-level keys of an OAuth client secret
/// downloaded from the Google console. They are only read to reject such
/// a file with a pointed message, since this bot does not run the OAuth
/// consent flow.
#[derive(Deserialize)]
struct CredentialsFile {
    api_key: Option<String>,
    access_token: Option<String>,
    installed: Option<serde_json::Value>,
    web: Option<serde_json::Value>,
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(Secret::new(key.into()))
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(Secret::new(token.into()))
    }

    /// Load credentials from a JSON file. An API key wins over a token when
    /// both are present.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |message: String| Error::Credentials {
            path: path.display().to_string(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let file: CredentialsFile =
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;

        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        if let Some(key) = non_empty(file.api_key) {
            debug!(path = %path.display(), "loaded youtube API key");
            return Ok(Self::api_key(key));
        }
        if let Some(token) = non_empty(file.access_token) {
            debug!(path = %path.display(), "loaded youtube access token");
            return Ok(Self::access_token(token));
        }
        if file.installed.is_some() || file.web.is_some() {
            return Err(invalid(
                "this is an OAuth client secret, not a credential; expected \
                 {\"api_key\": ...} or a cached token with {\"access_token\": ...}"
                    .into(),
            ));
        }
        Err(invalid("expected a non-empty `api_key` or `access_token`".into()))
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::ApiKey(key) => request.query(&[("key", key.expose_secret().as_str())]),
            Self::AccessToken(token) => request.bearer_auth(token.expose_secret()),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_api_key() {
        let file = write_file(r#"{"api_key": "AIza-test"}"#);
        match Credentials::load(file.path()).unwrap() {
            Credentials::ApiKey(key) => assert_eq!(key.expose_secret(), "AIza-test"),
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    fn loads_cached_oauth_token() {
        let file = write_file(
            r#"{"access_token": "ya29.tok", "token_type": "Bearer", "refresh_token": "1//r", "expiry": "2026-01-01T00:00:00Z"}"#,
        );
        match Credentials::load(file.path()).unwrap() {
            Credentials::AccessToken(token) => assert_eq!(token.expose_secret(), "ya29.tok"),
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_file(r#"{"api_key": "  "}"#);
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Credentials { .. }));
    }

    #[rstest]
    #[case::installed_app("installed")]
    #[case::web_app("web")]
    fn oauth_client_secret_is_rejected_with_hint(#[case] kind: &str) {
        let file = write_file(&format!(
            r#"{{"{kind}": {{"client_id": "123.apps.googleusercontent.com", "client_secret": "s", "redirect_uris": ["http://localhost"]}}}}"#
        ));
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Credentials { .. }));
        assert!(err.to_string().contains("OAuth client secret"), "{err}");
    }

    #[test]
    fn token_wins_over_client_secret_keys() {
        let file = write_file(r#"{"access_token": "ya29.tok", "installed": {}}"#);
        assert!(matches!(
            Credentials::load(file.path()).unwrap(),
            Credentials::AccessToken(_)
        ));
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = Credentials::load(Path::new("/nonexistent/ytbot-credentials.json")).unwrap_err();
        assert!(err.to_string().contains("ytbot-credentials.json"));
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::api_key("super-secret");
        assert!(!format!("{creds:?}").contains("super-secret"));
    }
}
