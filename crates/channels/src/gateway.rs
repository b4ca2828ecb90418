use {async_trait::async_trait, tokio::sync::mpsc, tokio_util::sync::CancellationToken};

use crate::{
    Result,
    command::{CommandCall, CommandSpec},
};

/// A message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the message arrived from, in the transport's string form.
    pub chat_id: String,
    /// Transport message ID, used to thread replies.
    pub message_id: String,
    pub text: String,
    /// Parsed command, when the text is a `/command`.
    pub command: Option<CommandCall>,
}

impl InboundMessage {
    /// Build a message, parsing `text` for a leading `/command`.
    pub fn new(
        chat_id: impl Into<String>,
        message_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let command = crate::command::parse_command(&text);
        Self {
            chat_id: chat_id.into(),
            message_id: message_id.into(),
            text,
            command,
        }
    }

    #[must_use]
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }
}

/// Receiver end of the inbound message stream.
pub type InboundReceiver = mpsc::Receiver<InboundMessage>;

/// Sender end of the inbound message stream.
pub type InboundSender = mpsc::Sender<InboundMessage>;

/// Per-send options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Thread the message as a reply to this message ID.
    pub reply_to: Option<String>,
}

impl SendOptions {
    #[must_use]
    pub fn reply_to(message_id: impl Into<String>) -> Self {
        Self {
            reply_to: Some(message_id.into()),
        }
    }
}

/// Chat transport used for notifications and command replies.
///
/// Text passed to [`send`](ChatGateway::send) is HTML-formatted; callers
/// escape untrusted content with [`escape_html`](crate::escape_html).
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Start receiving inbound messages.
    ///
    /// The stream runs until `cancel` fires. It can be taken once; later
    /// calls fail with [`Error::Unavailable`](crate::Error::Unavailable).
    async fn receive_inbound(&self, cancel: CancellationToken) -> Result<InboundReceiver>;

    /// Send `text` to the chat identified by `to`.
    async fn send(&self, to: &str, text: &str, options: SendOptions) -> Result<()>;

    /// Advertise the available commands to chat clients. No-op by default.
    async fn register_commands(&self, _commands: &[CommandSpec]) -> Result<()> {
        Ok(())
    }

    /// Wait for background work started by the gateway to finish. Called
    /// after the inbound stream's token was cancelled. No-op by default.
    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_message_parses_command() {
        let msg = InboundMessage::new("42", "7", "/channelid Some Channel");
        assert!(msg.is_command());
        let cmd = msg.command.unwrap();
        assert_eq!(cmd.name, "channelid");
        assert_eq!(cmd.args, "Some Channel");
    }

    #[test]
    fn plain_text_is_not_a_command() {
        let msg = InboundMessage::new("42", "7", "hello there");
        assert!(!msg.is_command());
    }

    #[test]
    fn send_options_reply_to() {
        assert_eq!(SendOptions::reply_to("9").reply_to.as_deref(), Some("9"));
        assert_eq!(SendOptions::default().reply_to, None);
    }
}
