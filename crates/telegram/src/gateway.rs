use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    teloxide::{prelude::*, types::BotCommand},
    tokio::{sync::mpsc, task::JoinHandle},
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use ytbot_channels::{ChatGateway, CommandSpec, InboundReceiver, SendOptions};

use crate::{Error, Result, bot, config::TelegramAccountConfig, outbound};

/// Capacity of the inbound message queue between the poller and consumers.
const INBOUND_BUFFER: usize = 64;

/// Telegram implementation of [`ChatGateway`].
pub struct TelegramGateway {
    bot: Bot,
    bot_username: Option<String>,
    config: TelegramAccountConfig,
    inbound_taken: AtomicBool,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl TelegramGateway {
    /// Validate the token against Telegram and prepare the gateway.
    pub async fn connect(config: TelegramAccountConfig) -> Result<Self> {
        let (bot, bot_username) = bot::connect(&config).await?;
        Ok(Self::from_parts(bot, bot_username, config))
    }

    pub(crate) fn from_parts(
        bot: Bot,
        bot_username: Option<String>,
        config: TelegramAccountConfig,
    ) -> Self {
        Self {
            bot,
            bot_username,
            config,
            inbound_taken: AtomicBool::new(false),
            poller: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }
}

fn into_channel_error(context: &str, error: Error) -> ytbot_channels::Error {
    match error {
        Error::Channel(inner) => inner,
        other => ytbot_channels::Error::external(context, other),
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn receive_inbound(
        &self,
        cancel: CancellationToken,
    ) -> ytbot_channels::Result<InboundReceiver> {
        if self.inbound_taken.swap(true, Ordering::SeqCst) {
            return Err(ytbot_channels::Error::unavailable(
                "telegram inbound stream already taken",
            ));
        }

        let (tx, rx) = mpsc::channel(INBOUND_BUFFER);
        let handle = bot::spawn_polling(
            self.bot.clone(),
            self.bot_username.clone(),
            &self.config,
            tx,
            cancel,
        );
        *self.poller.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(rx)
    }

    async fn send(&self, to: &str, text: &str, options: SendOptions) -> ytbot_channels::Result<()> {
        outbound::send_text(&self.bot, to, text, options.reply_to.as_deref())
            .await
            .map(|_| ())
            .map_err(|e| into_channel_error("telegram send", e))
    }

    async fn register_commands(&self, commands: &[CommandSpec]) -> ytbot_channels::Result<()> {
        let bot_commands: Vec<BotCommand> = commands
            .iter()
            .map(|c| BotCommand::new(c.name, c.description))
            .collect();
        self.bot
            .set_my_commands(bot_commands)
            .await
            .map_err(|e| into_channel_error("telegram setMyCommands", e.into()))?;
        info!(count = commands.len(), "telegram commands registered");
        Ok(())
    }

    async fn stop(&self) -> ytbot_channels::Result<()> {
        let handle = self
            .poller
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "telegram polling task ended abnormally");
        }
        Ok(())
    }
}
