//! Telegram transport for the bot.
//!
//! Implements [`ChatGateway`](ytbot_channels::ChatGateway) with teloxide:
//! inbound messages come from a manual `getUpdates` long-polling loop,
//! outbound messages go through `sendMessage` with rate-limit retries.

pub mod bot;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod outbound;

pub use {
    config::TelegramAccountConfig,
    error::{Error, Result},
    gateway::TelegramGateway,
};
