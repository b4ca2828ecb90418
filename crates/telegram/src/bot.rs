use std::time::Duration;

use {
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, UpdateKind},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use ytbot_channels::InboundSender;

use crate::{Error, Result, config::TelegramAccountConfig, handlers};

/// Headroom on top of the long-poll timeout so the HTTP client does not
/// abort a `getUpdates` request before Telegram answers.
const CLIENT_TIMEOUT_MARGIN_SECS: u64 = 15;

/// Build the bot client, verify the token and clear any webhook so long
/// polling works. Returns the bot and its username.
pub async fn connect(config: &TelegramAccountConfig) -> Result<(Bot, Option<String>)> {
    let client_timeout =
        Duration::from_secs(u64::from(config.poll_timeout_secs) + CLIENT_TIMEOUT_MARGIN_SECS);
    let client = teloxide::net::default_reqwest_settings()
        .timeout(client_timeout)
        .build()
        .map_err(|e| Error::message(format!("failed to build telegram http client: {e}")))?;
    let bot = Bot::with_client(config.token.expose_secret(), client);

    let me = bot.get_me().await?;
    let bot_username = me.username.clone();

    bot.delete_webhook().send().await?;

    info!(username = ?bot_username, "telegram bot connected (webhook cleared)");
    Ok((bot, bot_username))
}

/// Spawn the `getUpdates` loop feeding `tx`.
///
/// The loop ends when `cancel` fires, when the receiver is dropped, or when
/// Telegram reports that another instance is polling with the same token.
pub fn spawn_polling(
    bot: Bot,
    bot_username: Option<String>,
    config: &TelegramAccountConfig,
    tx: InboundSender,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let poll_timeout = config.poll_timeout_secs;
    let backoff = Duration::from_secs(config.retry_backoff_secs);

    tokio::spawn(async move {
        info!(poll_timeout, "starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            let request = bot
                .get_updates()
                .offset(offset)
                .timeout(poll_timeout)
                .allowed_updates(vec![AllowedUpdate::Message]);

            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = request.send() => result,
            };

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        let UpdateKind::Message(msg) = update.kind else {
                            debug!("ignoring non-message update");
                            continue;
                        };
                        let Some(inbound) = handlers::to_inbound(&msg, bot_username.as_deref())
                        else {
                            continue;
                        };
                        debug!(
                            chat_id = %inbound.chat_id,
                            is_command = inbound.is_command(),
                            "received telegram message"
                        );
                        if tx.send(inbound).await.is_err() {
                            info!("inbound receiver dropped, stopping telegram polling");
                            return;
                        }
                    }
                },
                Err(e) => {
                    if matches!(&e, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
                        warn!(
                            "telegram polling disabled: another instance is already running with this token"
                        );
                        break;
                    }

                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(backoff) => {},
                    }
                },
            }
        }

        info!("telegram polling stopped");
    })
}
