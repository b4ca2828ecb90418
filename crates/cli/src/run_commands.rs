use std::{path::Path, sync::Arc, time::Duration};

use {
    anyhow::{Context, Result},
    secrecy::ExposeSecret,
    tracing::{error, info, warn},
    ytbot_config::{BotConfig, CONFIG_FILENAMES, Severity, find_config_file, load_config},
    ytbot_notifier::ServiceSettings,
    ytbot_telegram::{TelegramAccountConfig, TelegramGateway},
    ytbot_youtube::{Credentials, YoutubeClient},
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Load the config from `dir`, connect both gateways and run until a
/// shutdown signal arrives.
pub async fn run(dir: &Path) -> Result<()> {
    let config = load_checked_config(dir)?;
    let cooldown = config
        .youtube
        .cooldown()
        .context("invalid youtube.cooldown")?;
    let request_timeout = config
        .youtube
        .request_timeout()
        .context("invalid youtube.request_timeout")?;

    let credentials_path = config.youtube.resolved_credentials_path(dir);
    let credentials = Credentials::load(&credentials_path)
        .context("failed to load youtube credentials")?;
    let platform = Arc::new(
        YoutubeClient::with_timeout(credentials, request_timeout)
            .context("failed to build youtube client")?,
    );

    let telegram_config = TelegramAccountConfig {
        poll_timeout_secs: config.telegram.poll_timeout_secs,
        retry_backoff_secs: config.telegram.retry_backoff_secs,
        ..TelegramAccountConfig::new(config.api_token.expose_secret().as_str())
    };
    let chat = Arc::new(
        TelegramGateway::connect(telegram_config)
            .await
            .context("failed to connect to telegram")?,
    );

    let settings = ServiceSettings {
        channel_ids: config.youtube.channels,
        destinations: config.chats,
        cooldown,
        request_timeout,
    };
    let handle = ytbot_notifier::start(settings, platform, chat)
        .await
        .context("failed to start notifier")?;

    shutdown_signal().await?;
    info!("shutdown signal received");
    handle.shutdown(SHUTDOWN_GRACE).await;
    info!("ytbot stopped");
    Ok(())
}

/// Find, validate and load the config. Any error diagnostic aborts startup.
fn load_checked_config(dir: &Path) -> Result<BotConfig> {
    let Some(path) = find_config_file(dir) else {
        anyhow::bail!(
            "no config file found in {} (looked for {})",
            dir.display(),
            CONFIG_FILENAMES.join(", ")
        );
    };

    let report = ytbot_config::validate(&path);
    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Error => error!(path = %diagnostic.path, "{diagnostic}"),
            Severity::Warning => warn!(path = %diagnostic.path, "{diagnostic}"),
        }
    }
    if report.has_errors() {
        anyhow::bail!(
            "{} has {} configuration error(s)",
            path.display(),
            report.count(Severity::Error)
        );
    }

    let config = load_config(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        path = %path.display(),
        channels = config.youtube.channels.len(),
        chats = config.chats.len(),
        "configuration loaded"
    );
    Ok(config)
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).context("failed to listen for SIGTERM")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("failed to listen for Ctrl+C")?,
            _ = sigterm.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl+C")?;
    }
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_with_errors_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "chats = [1]\napi_token = \"\"\n[youtube]\nchannels = [\"UC1\"]\n",
        )
        .unwrap();
        let err = load_checked_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn valid_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "chats: [1, \"@news\"]\napi_token: \"123:ABC\"\nyoutube:\n  channels: [UC1, UC2]\n  cooldown: 10m\n",
        )
        .unwrap();
        let config = load_checked_config(dir.path()).unwrap();
        assert_eq!(config.youtube.channels, ["UC1", "UC2"]);
        assert_eq!(config.chats.len(), 2);
        assert_eq!(config.youtube.cooldown().unwrap(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn missing_credentials_abort_startup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "chats = [1]\napi_token = \"123:ABC\"\n[youtube]\nchannels = [\"UC1\"]\n",
        )
        .unwrap();
        let err = run(dir.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains("youtube credentials"));
    }
}
