//! Chat command table and router.

use std::{sync::Arc, time::Duration};

use {
    futures::{FutureExt, future::BoxFuture},
    tracing::{debug, warn},
    ytbot_channels::{CommandSpec, escape_html},
    ytbot_youtube::VideoPlatform,
};

use crate::timeout::with_timeout;

pub const PING_REPLY: &str = "still alive";

/// Sent in HTML parse mode, so the placeholder brackets are escaped.
pub const CHANNELID_USAGE: &str = "usage: /channelid &lt;channel name&gt;";

/// Where a command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub chat_id: String,
}

/// Everything a handler may use to build its reply.
pub struct CommandRequest<'a> {
    /// Argument text after the command name, trimmed.
    pub args: &'a str,
    pub context: &'a CommandContext,
    pub platform: &'a dyn VideoPlatform,
    /// Limit for any platform call made by the handler.
    pub timeout: Duration,
}

/// Produces the reply text; an empty string means no reply.
pub type CommandHandler = for<'a> fn(CommandRequest<'a>) -> BoxFuture<'a, String>;

#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

pub const BUILTIN_COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "ping",
        description: "Check that the bot is running",
        handler: ping,
    },
    CommandDescriptor {
        name: "channelid",
        description: "Look up a YouTube channel ID by name",
        handler: channel_id,
    },
    CommandDescriptor {
        name: "chatid",
        description: "Show the ID of this chat",
        handler: chat_id,
    },
];

fn ping(_request: CommandRequest<'_>) -> BoxFuture<'_, String> {
    async { PING_REPLY.to_string() }.boxed()
}

fn channel_id(request: CommandRequest<'_>) -> BoxFuture<'_, String> {
    async move {
        let query = request.args.trim();
        if query.is_empty() {
            return CHANNELID_USAGE.to_string();
        }

        let resolved = with_timeout(
            "resolve channel id",
            request.timeout,
            request.platform.resolve_channel_id(query),
        )
        .await;

        match resolved {
            Ok(id) => id,
            Err(e) if e.is_not_found() => {
                debug!(query, "no channel matches query");
                format!("no channel found for \"{}\"", escape_html(query))
            },
            Err(e) => {
                warn!(query, error = %e, "channel lookup failed");
                format!("channel lookup failed: {}", escape_html(&e.to_string()))
            },
        }
    }
    .boxed()
}

fn chat_id(request: CommandRequest<'_>) -> BoxFuture<'_, String> {
    async move { request.context.chat_id.clone() }.boxed()
}

/// Maps a command name to its handler. First matching entry wins; unknown
/// names yield an empty reply.
pub struct CommandRouter {
    commands: Vec<CommandDescriptor>,
    platform: Arc<dyn VideoPlatform>,
    timeout: Duration,
}

impl CommandRouter {
    /// Router over [`BUILTIN_COMMANDS`].
    pub fn new(platform: Arc<dyn VideoPlatform>, timeout: Duration) -> Self {
        Self::with_commands(BUILTIN_COMMANDS.to_vec(), platform, timeout)
    }

    pub fn with_commands(
        commands: Vec<CommandDescriptor>,
        platform: Arc<dyn VideoPlatform>,
        timeout: Duration,
    ) -> Self {
        Self {
            commands,
            platform,
            timeout,
        }
    }

    /// Name and description of every command, for advertising to clients.
    #[must_use]
    pub fn specs(&self) -> Vec<CommandSpec> {
        self.commands
            .iter()
            .map(|c| CommandSpec {
                name: c.name,
                description: c.description,
            })
            .collect()
    }

    pub async fn route(&self, name: &str, args: &str, context: &CommandContext) -> String {
        let Some(descriptor) = self.commands.iter().find(|c| c.name == name) else {
            debug!(command = name, "unknown command");
            return String::new();
        };

        (descriptor.handler)(CommandRequest {
            args,
            context,
            platform: self.platform.as_ref(),
            timeout: self.timeout,
        })
        .await
    }
}
