//! Configuration validation.
//!
//! Detects unknown/misspelled keys, type errors and settings that would make
//! the bot useless or unable to start.

use std::{collections::HashSet, path::Path};

use {secrecy::ExposeSecret, serde_json::Value};

use crate::{loader::load_config_value, schema::BotConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "value"
    pub category: &'static str,
    /// Dotted path, e.g. "youtube.cooldown"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} [{}]: {}", self.severity, self.category, self.message)
        } else {
            write!(
                f,
                "{} [{}] {}: {}",
                self.severity, self.category, self.path, self.message
            )
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: &str,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

const ROOT_KEYS: &[&str] = &["chats", "api_token", "apitoken", "youtube", "telegram"];
const YOUTUBE_KEYS: &[&str] = &[
    "channels",
    "cooldown",
    "credentials_path",
    "ytsecret",
    "request_timeout",
];
const TELEGRAM_KEYS: &[&str] = &["poll_timeout_secs", "retry_backoff_secs"];

/// Telegram rejects long-poll timeouts above this value.
const MAX_POLL_TIMEOUT_SECS: u32 = 50;

/// Validate the config file at `path`.
#[must_use]
pub fn validate(path: &Path) -> ValidationResult {
    match load_config_value(path) {
        Ok(value) => validate_value(&value),
        Err(e) => {
            let mut result = ValidationResult::default();
            result.push(Severity::Error, "syntax", "", e.to_string());
            result
        },
    }
}

/// Validate an already parsed config value.
#[must_use]
pub fn validate_value(value: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_unknown_fields(value, &mut result);

    match serde_json::from_value::<BotConfig>(value.clone()) {
        Ok(config) => check_semantics(&config, &mut result),
        Err(e) => result.push(Severity::Error, "type-error", "", format!("type error: {e}")),
    }

    result
}

fn check_unknown_fields(value: &Value, result: &mut ValidationResult) {
    check_table(value, "", ROOT_KEYS, result);
    if let Some(youtube) = value.get("youtube") {
        check_table(youtube, "youtube", YOUTUBE_KEYS, result);
    }
    if let Some(telegram) = value.get("telegram") {
        check_table(telegram, "telegram", TELEGRAM_KEYS, result);
    }
}

fn check_table(value: &Value, prefix: &str, known: &[&str], result: &mut ValidationResult) {
    let Some(table) = value.as_object() else {
        return;
    };
    for key in table.keys() {
        if known.contains(&key.as_str()) {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let message = match suggest(key, known, 3) {
            Some(s) => format!("unknown field \"{key}\" (did you mean \"{s}\"?)"),
            None => format!("unknown field \"{key}\""),
        };
        result.push(Severity::Warning, "unknown-field", &path, message);
    }
}

fn check_semantics(config: &BotConfig, result: &mut ValidationResult) {
    let token = config.api_token.expose_secret().trim();
    if token.is_empty() {
        result.push(Severity::Error, "value", "api_token", "bot token is empty");
    } else if token.contains("${") {
        result.push(
            Severity::Error,
            "value",
            "api_token",
            "bot token contains an unresolved ${...} placeholder",
        );
    }

    if config.chats.is_empty() {
        result.push(
            Severity::Warning,
            "value",
            "chats",
            "no chats configured; new videos will not be announced anywhere",
        );
    }
    let mut seen_chats = HashSet::new();
    for chat in &config.chats {
        if !seen_chats.insert(chat.as_str()) {
            result.push(
                Severity::Warning,
                "value",
                "chats",
                format!("chat {chat} is listed more than once and will be notified twice"),
            );
        }
    }

    let yt = &config.youtube;
    if yt.channels.is_empty() {
        result.push(
            Severity::Warning,
            "value",
            "youtube.channels",
            "no channels configured; nothing will be tracked",
        );
    }
    let mut seen_channels = HashSet::new();
    for channel in &yt.channels {
        if channel.trim().is_empty() {
            result.push(
                Severity::Error,
                "value",
                "youtube.channels",
                "channel ID must not be empty",
            );
        } else if !seen_channels.insert(channel.as_str()) {
            result.push(
                Severity::Warning,
                "value",
                "youtube.channels",
                format!("channel {channel} is listed more than once"),
            );
        }
    }

    if let Err(e) = yt.cooldown() {
        result.push(Severity::Error, "value", "youtube.cooldown", e.to_string());
    }
    if let Err(e) = yt.request_timeout() {
        result.push(
            Severity::Error,
            "value",
            "youtube.request_timeout",
            e.to_string(),
        );
    }

    let poll_timeout = config.telegram.poll_timeout_secs;
    if poll_timeout == 0 || poll_timeout > MAX_POLL_TIMEOUT_SECS {
        result.push(
            Severity::Warning,
            "value",
            "telegram.poll_timeout_secs",
            format!("{poll_timeout}s is outside Telegram's long-poll range (1-{MAX_POLL_TIMEOUT_SECS}s)"),
        );
    }
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, levenshtein(needle, c)))
        .filter(|&(_, d)| d > 0 && d <= max_distance)
        .min_by_key(|&(_, d)| d)
        .map(|(c, _)| c)
}
