//! Slash-command parsing.

/// A parsed `/name args` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    /// Command name without the leading `/` or any `@botname` suffix.
    pub name: String,
    /// Remainder of the line, trimmed. Empty when no arguments were given.
    pub args: String,
}

/// Name and description of a command, as advertised to chat clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Parse a message text into a command.
///
/// Returns `None` unless the text starts with `/` followed by a non-empty
/// name.
pub fn parse_command(text: &str) -> Option<CommandCall> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim()),
        None => (rest, ""),
    };
    let name = head.split_once('@').map_or(head, |(name, _bot)| name);
    if name.is_empty() {
        return None;
    }
    Some(CommandCall {
        name: name.to_string(),
        args: args.to_string(),
    })
}
