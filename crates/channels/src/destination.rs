use serde::{Deserialize, Deserializer};

/// A chat that receives notifications.
///
/// Configured either as a numeric chat ID (`-1001234567890`) or as a
/// public `@channel` name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatDestination(String);

impl ChatDestination {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ChatDestination {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ChatDestination {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ChatDestination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Ok(Self::from(id)),
            Raw::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(serde::de::Error::custom("chat destination must not be empty"));
                }
                Ok(Self::new(name))
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Chats {
        chats: Vec<ChatDestination>,
    }

    #[test]
    fn deserialize_numeric_and_named() {
        let chats: Chats =
            toml::from_str(r#"chats = [123456789, -1001234567890, "@news"]"#).unwrap();
        let ids: Vec<&str> = chats.chats.iter().map(ChatDestination::as_str).collect();
        assert_eq!(ids, vec!["123456789", "-1001234567890", "@news"]);
    }

    #[test]
    fn deserialize_from_json() {
        let dest: ChatDestination = serde_json::from_str("-42").unwrap();
        assert_eq!(dest.to_string(), "-42");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(serde_json::from_str::<ChatDestination>(r#""  ""#).is_err());
    }
}
