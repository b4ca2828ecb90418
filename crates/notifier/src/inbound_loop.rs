use std::{sync::Arc, time::Duration};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
    ytbot_channels::{ChatGateway, InboundMessage, InboundReceiver, SendOptions},
};

use crate::{
    commands::{CommandContext, CommandRouter},
    timeout::with_timeout,
};

/// Answers commands arriving on the chat's inbound stream.
pub struct InboundLoop {
    chat: Arc<dyn ChatGateway>,
    router: CommandRouter,
    send_timeout: Duration,
}

impl InboundLoop {
    pub fn new(chat: Arc<dyn ChatGateway>, router: CommandRouter, send_timeout: Duration) -> Self {
        Self {
            chat,
            router,
            send_timeout,
        }
    }

    /// Consume `inbound` until it ends or `cancel` fires.
    pub async fn run(self, mut inbound: InboundReceiver, cancel: CancellationToken) {
        info!("inbound loop started");

        loop {
            let message = tokio::select! {
                () = cancel.cancelled() => break,
                message = inbound.recv() => message,
            };
            let Some(message) = message else {
                info!("inbound stream closed");
                break;
            };

            tokio::select! {
                () = cancel.cancelled() => break,
                () = self.handle(message) => {},
            }
        }

        info!("inbound loop stopped");
    }

    async fn handle(&self, message: InboundMessage) {
        let Some(command) = &message.command else {
            return;
        };

        let context = CommandContext {
            chat_id: message.chat_id.clone(),
        };
        let reply = self
            .router
            .route(&command.name, &command.args, &context)
            .await;
        if reply.is_empty() {
            return;
        }

        let sent = with_timeout(
            "send command reply",
            self.send_timeout,
            self.chat.send(
                &message.chat_id,
                &reply,
                SendOptions::reply_to(message.message_id.as_str()),
            ),
        )
        .await;

        match sent {
            Ok(()) => debug!(
                chat_id = %message.chat_id,
                command = %command.name,
                "command reply sent"
            ),
            Err(e) => warn!(
                chat_id = %message.chat_id,
                command = %command.name,
                error = %e,
                "failed to send command reply"
            ),
        }
    }
}
