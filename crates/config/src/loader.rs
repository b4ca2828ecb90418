use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result, env_subst::substitute_env, schema::BotConfig};

/// Config file names looked up in the working directory, in order.
pub const CONFIG_FILENAMES: &[&str] = &["config.toml", "config.yaml", "config.yml", "config.json"];

/// Find the first config file inside `dir`.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Locate and load the config file inside `dir`.
pub fn load_from_dir(dir: &Path) -> Result<(PathBuf, BotConfig)> {
    let path = find_config_file(dir).ok_or_else(|| Error::NotFound {
        dir: dir.to_path_buf(),
    })?;
    let config = load_config(&path)?;
    Ok((path, config))
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<BotConfig> {
    let value = load_config_value(path)?;
    let config = serde_json::from_value(value).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Read a config file, substitute `${ENV}` placeholders and parse it into a
/// format-neutral JSON value.
pub fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_value(&substitute_env(&raw), path)
}

pub(crate) fn parse_config_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    match ext {
        "toml" => {
            let v: toml::Value = toml::from_str(raw).map_err(|e| parse_err(e.to_string()))?;
            serde_json::to_value(v).map_err(|e| parse_err(e.to_string()))
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value =
                serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string()))?;
            serde_json::to_value(v).map_err(|e| parse_err(e.to_string()))
        },
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {secrecy::ExposeSecret, ytbot_channels::ChatDestination};

    use super::*;

    #[test]
    fn loads_toml_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
chats = [-100123]
api_token = "tok"

[youtube]
channels = ["UC_a"]
"#,
        )
        .unwrap();

        let (path, cfg) = load_from_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("config.toml"));
        assert_eq!(cfg.chats, vec![ChatDestination::from(-100123)]);
        assert_eq!(cfg.youtube.channels, vec!["UC_a"]);
    }

    #[test]
    fn toml_preferred_over_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "api_token: from-yaml\n").unwrap();
        std::fs::write(dir.path().join("config.toml"), "api_token = \"from-toml\"\n").unwrap();

        let (_, cfg) = load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.api_token.expose_secret(), "from-toml");
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("config.yaml");
        std::fs::write(
            &yaml,
            "chats: [42, \"@news\"]\nyoutube:\n  channels: [UC_y]\n  cooldown: 1h\n",
        )
        .unwrap();
        let cfg = load_config(&yaml).unwrap();
        assert_eq!(cfg.chats.len(), 2);
        assert_eq!(cfg.youtube.cooldown, "1h");

        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"youtube": {"channels": ["UC_j"]}}"#).unwrap();
        let cfg = load_config(&json).unwrap();
        assert_eq!(cfg.youtube.channels, vec!["UC_j"]);
    }

    #[test]
    fn missing_config_reports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "chats = [").unwrap();
        assert!(matches!(load_config(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "chats = [1.5]").unwrap();
        assert!(matches!(load_config(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn unsupported_extension() {
        let err = parse_config_value("", Path::new("config.ini")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
