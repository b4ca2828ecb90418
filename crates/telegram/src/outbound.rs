use std::{future::Future, time::Duration};

use {
    teloxide::{
        RequestError,
        payloads::SendMessageSetters,
        prelude::*,
        types::{ChatId, MessageId, ParseMode, Recipient, ReplyParameters},
    },
    tracing::{debug, warn},
};

use crate::Result;

const TELEGRAM_RETRY_AFTER_MAX_RETRIES: usize = 4;

/// Send `text` to `to` as HTML, falling back to plain text when Telegram
/// rejects the markup.
pub async fn send_text(
    bot: &Bot,
    to: &str,
    text: &str,
    reply_to: Option<&str>,
) -> Result<MessageId> {
    let recipient = parse_recipient(to)?;
    let reply_params = parse_reply_params(reply_to);

    match run_telegram_request_with_retry(to, "send message (html)", || {
        let mut html_req = bot
            .send_message(recipient.clone(), text)
            .parse_mode(ParseMode::Html);
        if let Some(rp) = &reply_params {
            html_req = html_req.reply_parameters(rp.clone());
        }
        async move { html_req.await }
    })
    .await
    {
        Ok(message) => {
            debug!(chat_id = to, message_id = message.id.0, "telegram message sent");
            Ok(message.id)
        },
        // Only an API rejection means the markup may be at fault; transport
        // errors are surfaced as-is.
        Err(e @ RequestError::Api(_)) => {
            warn!(
                chat_id = to,
                error = %e,
                "telegram HTML send failed, retrying as plain text"
            );
            let message = run_telegram_request_with_retry(to, "send message (plain)", || {
                let mut plain_req = bot.send_message(recipient.clone(), text);
                if let Some(rp) = &reply_params {
                    plain_req = plain_req.reply_parameters(rp.clone());
                }
                async move { plain_req.await }
            })
            .await?;
            Ok(message.id)
        },
        Err(e) => Err(e.into()),
    }
}

async fn run_telegram_request_with_retry<T, F, Fut>(
    to: &str,
    operation: &'static str,
    mut request: F,
) -> std::result::Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, RequestError>>,
{
    let mut retries = 0usize;

    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let Some(wait) = retry_after_duration(&err) else {
                    return Err(err);
                };

                if retries >= TELEGRAM_RETRY_AFTER_MAX_RETRIES {
                    warn!(
                        chat_id = to,
                        operation,
                        retries,
                        retry_after_secs = wait.as_secs(),
                        "telegram rate limit persisted after retries"
                    );
                    return Err(err);
                }

                retries += 1;
                warn!(
                    chat_id = to,
                    operation,
                    retries,
                    max_retries = TELEGRAM_RETRY_AFTER_MAX_RETRIES,
                    retry_after_secs = wait.as_secs(),
                    "telegram rate limited, waiting before retry"
                );
                tokio::time::sleep(wait).await;
            },
        }
    }
}

/// Map a destination string onto a Telegram recipient: numeric chat ids
/// or `@channelusername`.
pub(crate) fn parse_recipient(to: &str) -> ytbot_channels::Result<Recipient> {
    let to = to.trim();
    if let Ok(id) = to.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if to.len() > 1 && to.starts_with('@') {
        return Ok(Recipient::ChannelUsername(to.to_string()));
    }
    Err(ytbot_channels::Error::unknown_destination(to))
}

/// Telegram message ids are i32; anything else yields no reply threading.
fn parse_reply_params(reply_to: Option<&str>) -> Option<ReplyParameters> {
    reply_to
        .and_then(|id| id.parse::<i32>().ok())
        .map(|id| ReplyParameters::new(MessageId(id)).allow_sending_without_reply())
}

fn retry_after_duration(error: &RequestError) -> Option<Duration> {
    match error {
        RequestError::RetryAfter(wait) => Some(wait.duration()),
        _ => None,
    }
}
